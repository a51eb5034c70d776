//! Renders a short chord progression to `organ.wav`.
//!
//! Run with: cargo run --example render_wav --features wav-writer

use anyhow::Result;
use tonewheel::{Config, StartPhase, ToneGenerator, render_into};

const SAMPLE_RATE: u32 = 44100;

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;

    let config = Config::default()
        .with_registration("88 8000 000".parse()?)
        .with_start_phase(StartPhase::Random { seed: 7 });
    let mut organ = ToneGenerator::<SAMPLE_RATE>::with_config(config)?;

    // C major, F major, G major, C major around middle C
    let chords: [[usize; 3]; 4] = [[24, 28, 31], [29, 33, 36], [31, 35, 38], [24, 28, 31]];
    let controls = organ.controls();

    let path = std::path::Path::new("organ.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;

    for chord in &chords {
        controls.release_all();
        for &key in chord {
            controls.press_key(key)?;
        }
        render_into(&mut organ, &mut writer, SAMPLE_RATE as usize)?;
    }
    writer.finalize()?;

    println!("Wrote {}", path.display());
    Ok(())
}
