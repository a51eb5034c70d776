//! Audio signal trait for sample-rate-aware signals.

use crate::Signal;

/// Common interface for anything that can be played as audio.
///
/// This trait extends `Signal` to add the sample rate at the type level. The
/// sample rate is encoded as a const generic parameter, so a generator built
/// for 44100 Hz cannot be handed to a host expecting 48000 Hz by accident.
///
/// # Type Parameters
///
/// * `SAMPLE_RATE` - Sample rate in Hz (e.g., 44100 for CD quality)
///
/// # Examples
///
/// ```
/// use tonewheel::{AudioSignal, ToneGenerator};
///
/// let organ = ToneGenerator::<44100>::new().unwrap();
/// assert_eq!(organ.sample_rate(), 44100.0);
/// ```
pub trait AudioSignal<const SAMPLE_RATE: u32>: Signal {
    /// Gets the sample rate at which this audio is being generated.
    ///
    /// # Returns
    ///
    /// Sample rate in Hz (e.g., 44100.0 for CD quality)
    fn sample_rate(&self) -> f64 {
        SAMPLE_RATE as f64
    }
}
