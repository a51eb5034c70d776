//! Core signal traits.
//!
//! Two views of the same audio stream are provided:
//! - `Signal` produces floating-point samples one at a time, which is
//!   convenient for tests, offline rendering and floating-point hosts
//! - `BlockSource` writes whole blocks of 16-bit fixed-point samples, which
//!   is what a periodic audio callback asks for

/// Common interface for anything that generates floating-point samples.
///
/// The trait provides two fundamental operations:
/// - Single sample generation via `next_sample()`
/// - Batch processing via `process()`
pub trait Signal {
    /// Generates the next sample from the signal.
    ///
    /// # Returns
    ///
    /// A sample value in the range [-1.0, 1.0)
    fn next_sample(&mut self) -> f64;

    /// Generates multiple samples into a buffer.
    ///
    /// Default implementation calls `next_sample()` for each element.
    /// Implementors may override this for more efficient batch processing.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Mutable slice to fill with samples
    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// A source of fixed-point sample blocks.
///
/// This is the whole contract a host audio graph needs: hand over a slice,
/// get exactly that many samples back. Implementors continue exactly where
/// the previous call stopped, so splitting one request into several smaller
/// ones yields the same samples.
///
/// Implementations used on a real-time thread must not block or allocate.
pub trait BlockSource {
    /// Writes `block.len()` consecutive samples into `block`.
    ///
    /// A host holding a larger buffer and a sample count passes
    /// `&mut buffer[..count]`.
    fn fill(&mut self, block: &mut [i16]);
}
