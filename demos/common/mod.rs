//! Common utilities for the interactive demos.

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use crossterm::{
    ExecutableCommand,
    event::{
        self, Event, KeyCode, KeyEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use std::panic;
use std::time::Duration;
use tonewheel::BlockSource;

/// Largest block rendered per callback chunk.
const CALLBACK_BLOCK: usize = 256;

/// Configuration for keyboard enhancements (needed for detecting key press/release).
#[derive(Default)]
pub struct KeyboardConfig {
    /// Enable keyboard enhancements (for press/release detection)
    pub enable_enhancements: bool,
}

impl KeyboardConfig {
    /// Create config that enables keyboard enhancements for press/release detection
    pub fn with_enhancements() -> Self {
        Self {
            enable_enhancements: true,
        }
    }
}

/// Key handling result that controls the event loop
pub enum KeyAction {
    /// Continue the event loop
    Continue,
    /// Exit the event loop
    Exit,
}

/// Runs an interactive demo with terminal UI.
///
/// The block source is moved into the audio callback and owned by it; the
/// key handler talks to it only through whatever lock-free handle it
/// captured beforehand (e.g. `tonewheel::Controls`).
///
/// # Arguments
///
/// * `source` - Sample source, moved onto the audio thread
/// * `keyboard_config` - Configuration for keyboard handling
/// * `initial_ui` - Closure to draw the initial UI
/// * `key_handler` - Closure that handles key events and returns whether to continue or exit
pub fn run_interactive_example<S, F, K>(
    source: S,
    keyboard_config: KeyboardConfig,
    initial_ui: F,
    mut key_handler: K,
) -> Result<()>
where
    S: BlockSource + Send + 'static,
    F: FnOnce() -> Result<()>,
    K: FnMut(&KeyEvent) -> Result<KeyAction>,
{
    // Setup audio
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No output device available"))?;

    let config = device.default_output_config()?;
    log::info!(
        "output device ready: {} Hz, {} channel(s), {}",
        config.sample_rate().0,
        config.channels(),
        config.sample_format()
    );

    // Start audio stream
    let _stream = match config.sample_format() {
        SampleFormat::F32 => create_audio_stream::<f32, S>(&device, &config.into(), source)?,
        SampleFormat::I16 => create_audio_stream::<i16, S>(&device, &config.into(), source)?,
        SampleFormat::U16 => create_audio_stream::<u16, S>(&device, &config.into(), source)?,
        sample_format => {
            return Err(anyhow::anyhow!(
                "Unsupported sample format: {}",
                sample_format
            ));
        }
    };

    // Setup terminal - keyboard enhancements MUST come before alternate screen
    if keyboard_config.enable_enhancements {
        stdout().execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(crossterm::cursor::Hide)?;

    // Set up panic hook to restore terminal on panic
    let has_enhancements = keyboard_config.enable_enhancements;
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal(has_enhancements);
        original_hook(panic_info);
    }));

    // Draw initial UI
    initial_ui()?;

    // Event loop
    loop {
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key_event) = event::read()?
        {
            match key_handler(&key_event)? {
                KeyAction::Continue => {}
                KeyAction::Exit => break,
            }
        }
    }

    // Cleanup terminal
    cleanup_terminal(keyboard_config.enable_enhancements);

    Ok(())
}

/// Creates an audio stream that pulls mono blocks from the source and
/// copies each sample to every output channel.
fn create_audio_stream<T, S>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut source: S,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<i16> + cpal::SizedSample,
    S: BlockSource + Send + 'static,
{
    let channels = config.channels as usize;
    let mut block = [0i16; CALLBACK_BLOCK];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frames in data.chunks_mut(channels * CALLBACK_BLOCK) {
                let mono = &mut block[..frames.len() / channels];
                source.fill(mono);
                for (frame, &sample) in frames.chunks_mut(channels).zip(mono.iter()) {
                    let value: T = T::from_sample(sample);
                    for s in frame.iter_mut() {
                        *s = value;
                    }
                }
            }
        },
        |err| log::error!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Cleans up terminal state (cursor, alternate screen, raw mode).
fn cleanup_terminal(has_keyboard_enhancements: bool) {
    if has_keyboard_enhancements {
        let _ = stdout().execute(PopKeyboardEnhancementFlags);
    }
    let _ = stdout().execute(crossterm::cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Helper to check if a key code is a quit key (Q, ESC).
pub fn is_quit_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
}
