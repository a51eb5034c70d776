//! Precomputed quasi-sine wavetable shared by every tonewheel.
//!
//! A tonewheel's output is close to a sine wave. Computing `sin()` for 91
//! wheels on every sample would blow the real-time budget, so one period is
//! sampled into a table once at construction and the audio path only does
//! integer lookups.
//!
//! ## Layout
//!
//! The table holds `TABLE_SIZE` Q15 samples plus one guard sample (a copy of
//! the first), so linear interpolation can always read `index + 1` without
//! wrapping. The top `TABLE_BITS` bits of a 32-bit phase select the entry;
//! the next 16 bits are the interpolation fraction.
//!
//! ## Shape
//!
//! Real wheels are not perfectly round, and their pickups add some odd
//! harmonic content. `third_harmonic` blends in a third partial at the given
//! relative amplitude; the result is renormalized to full scale.

use std::collections::TryReserveError;
use std::f64::consts::PI;

/// Address bits of the table.
pub const TABLE_BITS: u32 = 10;

/// Number of samples in one period.
pub const TABLE_SIZE: usize = 1 << TABLE_BITS;

const INDEX_SHIFT: u32 = 32 - TABLE_BITS;
const FRACTION_SHIFT: u32 = INDEX_SHIFT - 16;

/// Interpolation mode for wavetable playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Round to the nearest table entry (fastest, audible aliasing)
    Nearest,
    /// Linear interpolation between adjacent entries
    #[default]
    Linear,
}

/// One period of the tonewheel waveform in Q15.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wavetable {
    samples: Vec<i16>,
}

impl Wavetable {
    /// Builds the table.
    ///
    /// # Arguments
    ///
    /// * `third_harmonic` - Relative amplitude of the third partial (0.0 for
    ///   a pure sine)
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the table cannot be reserved.
    pub fn quasi_sine(third_harmonic: f64) -> Result<Self, TryReserveError> {
        let third_harmonic = if third_harmonic.is_finite() {
            third_harmonic
        } else {
            0.0
        };
        let shape = |i: usize| {
            let angle = 2.0 * PI * i as f64 / TABLE_SIZE as f64;
            angle.sin() + third_harmonic * (3.0 * angle).sin()
        };

        let peak = (0..TABLE_SIZE)
            .map(|i| shape(i).abs())
            .fold(0.0_f64, f64::max);
        let scale = if peak > 0.0 {
            f64::from(i16::MAX) / peak
        } else {
            0.0
        };

        let mut samples = Vec::new();
        samples.try_reserve_exact(TABLE_SIZE + 1)?;
        samples.extend((0..TABLE_SIZE).map(|i| (shape(i) * scale).round() as i16));
        samples.push(samples[0]);

        Ok(Self { samples })
    }

    /// Reads the waveform at `phase`.
    #[inline]
    pub fn lookup(&self, phase: u32, mode: InterpolationMode) -> i16 {
        match mode {
            InterpolationMode::Nearest => {
                let rounded = phase.wrapping_add(1 << (INDEX_SHIFT - 1));
                self.samples[(rounded >> INDEX_SHIFT) as usize]
            }
            InterpolationMode::Linear => {
                let index = (phase >> INDEX_SHIFT) as usize;
                let frac = ((phase >> FRACTION_SHIFT) & 0xFFFF) as i32;

                let sample0 = i32::from(self.samples[index]);
                let sample1 = i32::from(self.samples[index + 1]);

                (sample0 + (((sample1 - sample0) * frac) >> 16)) as i16
            }
        }
    }

    /// The samples of one period, without the guard sample.
    pub fn samples(&self) -> &[i16] {
        &self.samples[..TABLE_SIZE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter(n: u32) -> u32 {
        n << 30
    }

    #[test]
    fn test_sine_landmarks() {
        let table = Wavetable::quasi_sine(0.0).unwrap();
        for mode in [InterpolationMode::Nearest, InterpolationMode::Linear] {
            assert_eq!(table.lookup(0, mode), 0);
            assert_eq!(table.lookup(quarter(1), mode), i16::MAX);
            assert_eq!(table.lookup(quarter(2), mode), 0);
            assert_eq!(table.lookup(quarter(3), mode), -i16::MAX);
        }
    }

    #[test]
    fn test_guard_sample() {
        let table = Wavetable::quasi_sine(0.0).unwrap();
        assert_eq!(table.samples().len(), TABLE_SIZE);
        // Last stretch of the period interpolates towards the first entry
        let near_end = u32::MAX;
        assert!(table.lookup(near_end, InterpolationMode::Linear).abs() < 300);
    }

    #[test]
    fn test_linear_interpolation_is_between_neighbours() {
        let table = Wavetable::quasi_sine(0.0).unwrap();
        let index = 100u32;
        let phase = (index << INDEX_SHIFT) | (1 << (INDEX_SHIFT - 1));
        let value = table.lookup(phase, InterpolationMode::Linear);
        let a = table.samples()[index as usize];
        let b = table.samples()[index as usize + 1];
        assert!(value >= a.min(b) && value <= a.max(b));
    }

    #[test]
    fn test_nearest_wraps_at_end_of_period() {
        let table = Wavetable::quasi_sine(0.0).unwrap();
        assert_eq!(table.lookup(u32::MAX, InterpolationMode::Nearest), 0);
    }

    #[test]
    fn test_third_harmonic_stays_full_scale() {
        let table = Wavetable::quasi_sine(0.2).unwrap();
        let peak = table.samples().iter().map(|s| s.unsigned_abs()).max();
        assert_eq!(peak, Some(i16::MAX as u16));
    }

    #[test]
    fn test_non_finite_harmonic_is_pure_sine() {
        let pure = Wavetable::quasi_sine(0.0).unwrap();
        let odd = Wavetable::quasi_sine(f64::INFINITY).unwrap();
        assert_eq!(pure, odd);
    }
}
