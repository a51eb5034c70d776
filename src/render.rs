//! Offline rendering to WAV files (requires the `wav-writer` feature).

use std::io::{Seek, Write};
use std::path::Path;

use hound::WavWriter;
use log::info;
use snafu::ResultExt;

use crate::common::{BlockSource, Error, WavSnafu};

/// Samples rendered per block while writing.
const RENDER_BLOCK: usize = 512;

/// Renders `samples` samples from `source` into a mono 16-bit WAV file.
///
/// # Arguments
///
/// * `source` - Anything producing fixed-point blocks, e.g. a `ToneGenerator`
/// * `path` - Output file, created or truncated
/// * `sample_rate` - Sample rate written to the file header
/// * `samples` - Number of samples to render
///
/// # Errors
///
/// Returns `Error::Wav` if the file cannot be created or written.
///
/// # Examples
///
/// ```no_run
/// use tonewheel::{ToneGenerator, render_wav};
///
/// let mut organ = ToneGenerator::<44100>::new().unwrap();
/// organ.set_registration("88 8000 000".parse().unwrap());
/// organ.press_key(24).unwrap();
/// render_wav(&mut organ, "organ.wav", 44100, 44100 * 2).unwrap();
/// ```
pub fn render_wav<S, P>(source: &mut S, path: P, sample_rate: u32, samples: usize) -> Result<(), Error>
where
    S: BlockSource + ?Sized,
    P: AsRef<Path>,
{
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let path = path.as_ref();
    let mut writer = WavWriter::create(path, spec).boxed().context(WavSnafu)?;
    render_into(source, &mut writer, samples)?;
    writer.finalize().boxed().context(WavSnafu)?;

    info!("rendered {} samples to {}", samples, path.display());
    Ok(())
}

/// Appends `samples` samples from `source` to an open WAV writer.
///
/// The writer's spec should be mono with 16-bit integer samples. Call this
/// repeatedly to write one file in several passes, e.g. while changing
/// drawbars or keys in between.
///
/// # Errors
///
/// Returns `Error::Wav` if a sample cannot be written.
pub fn render_into<S, W>(source: &mut S, writer: &mut WavWriter<W>, samples: usize) -> Result<(), Error>
where
    S: BlockSource + ?Sized,
    W: Write + Seek,
{
    let mut block = [0i16; RENDER_BLOCK];
    let mut remaining = samples;

    while remaining > 0 {
        let count = remaining.min(RENDER_BLOCK);
        let chunk = &mut block[..count];
        source.fill(chunk);
        for &sample in chunk.iter() {
            writer.write_sample(sample).boxed().context(WavSnafu)?;
        }
        remaining -= count;
    }

    Ok(())
}
