//! Interactive tonewheel organ.
//!
//! The home row plays one octave starting at middle C:
//!   A W S E D F T G Y H U J K  ->  C C# D D# E F F# G G# A A# B C
//! Digits 1-9 pull a drawbar out one step, SHIFT+digit (!@#$%^&*() on US
//! layouts) pushes it back in. Z and X shift the octave. Q or ESC quits.
//!
//! The generator lives on the audio thread; this thread only touches it
//! through its lock-free `Controls` handle.

mod common;

use anyhow::Result;
use common::{KeyAction, KeyboardConfig, is_quit_key, run_interactive_example};
use crossterm::{
    ExecutableCommand,
    event::{KeyCode, KeyEvent, KeyEventKind},
};
use std::io::{Write, stdout};
use tonewheel::organ::layout::{FOOTAGES, KEY_COUNT, MAX_LEVEL};
use tonewheel::{Config, Controls, StartPhase, ToneGenerator};

const SAMPLE_RATE: u32 = 44100;

const NOTE_KEYS: [char; 13] = [
    'a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k',
];
const PUSH_KEYS: [char; 9] = ['!', '@', '#', '$', '%', '^', '&', '*', '('];

struct Player {
    controls: Controls,
    octave: usize,
}

impl Player {
    fn key_for(&self, c: char) -> Option<usize> {
        let offset = NOTE_KEYS.iter().position(|&k| k == c)?;
        let key = self.octave * 12 + offset;
        (key < KEY_COUNT).then_some(key)
    }

    fn handle(&mut self, code: KeyCode, kind: KeyEventKind) -> Result<()> {
        let KeyCode::Char(c) = code else {
            return Ok(());
        };
        let down = matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat);

        if let Some(key) = self.key_for(c.to_ascii_lowercase()) {
            if down {
                self.controls.press_key(key)?;
            } else {
                self.controls.release_key(key)?;
            }
            return Ok(());
        }

        if kind != KeyEventKind::Press {
            return Ok(());
        }

        if let Some(drawbar) = c.to_digit(10).filter(|d| (1..=9).contains(d)) {
            let drawbar = drawbar as usize - 1;
            let level = self.controls.volume(drawbar)?;
            self.controls.set_volume(drawbar, (level + 1).min(MAX_LEVEL))?;
        } else if let Some(drawbar) = PUSH_KEYS.iter().position(|&k| k == c) {
            let level = self.controls.volume(drawbar)?;
            self.controls.set_volume(drawbar, level.saturating_sub(1))?;
        } else if c == 'z' && self.octave > 0 {
            self.controls.release_all();
            self.octave -= 1;
        } else if c == 'x' && self.octave < KEY_COUNT / 12 - 1 {
            self.controls.release_all();
            self.octave += 1;
        }
        Ok(())
    }
}

fn draw_ui(player: &Player) -> Result<()> {
    let mut stdout = stdout();
    stdout.execute(crossterm::terminal::Clear(
        crossterm::terminal::ClearType::All,
    ))?;
    stdout.execute(crossterm::cursor::MoveTo(0, 0))?;

    let registration = player.controls.registration();
    write!(
        stdout,
        "Registration {}  | octave {} | A..K=play 1-9/SHIFT=drawbars Z/X=octave Q=quit\r\n\r\n",
        registration,
        player.octave
    )?;
    for (footage, level) in FOOTAGES.iter().zip(registration.levels()) {
        write!(
            stdout,
            "{:>7} {:<8}|\r\n",
            footage,
            "#".repeat(level as usize)
        )?;
    }
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Warn)?;

    let config = Config::default()
        .with_registration("88 8000 000".parse()?)
        .with_start_phase(StartPhase::Random { seed: 1955 })
        .with_third_harmonic(0.05);
    let organ = ToneGenerator::<SAMPLE_RATE>::with_config(config)?;

    let mut player = Player {
        controls: organ.controls(),
        octave: 2,
    };
    let initial = Player {
        controls: organ.controls(),
        octave: 2,
    };

    run_interactive_example(
        organ,
        KeyboardConfig::with_enhancements(),
        || draw_ui(&initial),
        |key_event: &KeyEvent| {
            if is_quit_key(key_event.code) && matches!(key_event.kind, KeyEventKind::Press) {
                return Ok(KeyAction::Exit);
            }

            player.handle(key_event.code, key_event.kind)?;
            draw_ui(&player)?;
            Ok(KeyAction::Continue)
        },
    )?;

    println!("\nGoodbye!");
    Ok(())
}
