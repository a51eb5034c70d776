//! Fixed-point helpers shared by the synthesis code.
//!
//! Formats used throughout the crate:
//! - waveform samples are Q15 (`i16`, full scale = 32767)
//! - gains are Q12 (`4096` = unity)
//! - phases are unsigned 32-bit fractions of one period

/// Fractional bits of a Q12 gain.
pub const GAIN_BITS: u32 = 12;

/// Unity gain in Q12.
pub const UNITY_GAIN: u32 = 1 << GAIN_BITS;

/// Converts a linear gain to Q12, saturating at `u32::MAX`.
///
/// Negative and NaN gains map to zero.
pub fn gain_to_q12(gain: f64) -> u32 {
    let scaled = (gain * UNITY_GAIN as f64).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Clamps a wide accumulator into the `i16` output range.
///
/// Overdriven mixes flatten against the rails instead of wrapping around,
/// the way an analog output stage clips.
#[inline]
pub fn saturate(value: i64) -> i16 {
    value.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

/// Converts a Q15 sample to a float in [-1.0, 1.0).
#[inline]
pub fn q15_to_f64(sample: i16) -> f64 {
    f64::from(sample) / 32768.0
}
