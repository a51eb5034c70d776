//! Construction-time settings for `ToneGenerator`.

use super::layout::{HarmonicLayout, Tuning};
use super::registration::Registration;
use super::wavetable::InterpolationMode;

/// Upper bound for `Config::output_gain`.
pub const MAX_OUTPUT_GAIN: f64 = 64.0;

/// Default length of the gain ramp after a drawbar or key change, in
/// samples (about 1.5 ms at 44.1 kHz).
pub const DEFAULT_GAIN_RAMP: u16 = 64;

/// Where the wheels start turning from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPhase {
    /// Every wheel starts at phase zero.
    #[default]
    Zero,
    /// Each wheel starts at a pseudo-random phase drawn from `seed`. The same
    /// seed always gives the same phases.
    Random { seed: u64 },
}

/// Settings fixed for the lifetime of a generator.
///
/// All fields have defaults; override them with the `with_*` methods.
///
/// # Examples
///
/// ```
/// use tonewheel::{Config, InterpolationMode, StartPhase, ToneGenerator, Tuning};
///
/// let config = Config::default()
///     .with_tuning(Tuning::EqualTemperament { a4_hz: 442.0 })
///     .with_start_phase(StartPhase::Random { seed: 7 })
///     .with_interpolation(InterpolationMode::Nearest)
///     .with_registration("88 8000 000".parse().unwrap());
///
/// let organ = ToneGenerator::<48000>::with_config(config).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How wheel frequencies are derived
    pub tuning: Tuning,
    /// Initial wheel phases
    pub start_phase: StartPhase,
    /// Wavetable interpolation
    pub interpolation: InterpolationMode,
    /// Drawbar levels before any control input
    pub registration: Registration,
    /// Linear gain applied to the summed wheels before saturation
    pub output_gain: f64,
    /// Relative amplitude of the third partial in the wheel waveform
    pub third_harmonic: f64,
    /// Wheel tuning and key routing
    pub layout: &'static HarmonicLayout,
    /// Samples over which wheel gains glide to new control settings; zero
    /// switches them at once
    pub gain_ramp: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            start_phase: StartPhase::default(),
            interpolation: InterpolationMode::default(),
            registration: Registration::SILENT,
            output_gain: 0.125,
            third_harmonic: 0.0,
            layout: &HarmonicLayout::STANDARD,
            gain_ramp: DEFAULT_GAIN_RAMP,
        }
    }
}

impl Config {
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_start_phase(mut self, start_phase: StartPhase) -> Self {
        self.start_phase = start_phase;
        self
    }

    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = registration;
        self
    }

    /// Sets the output gain, clamped to `0.0..=MAX_OUTPUT_GAIN`.
    pub fn with_output_gain(mut self, gain: f64) -> Self {
        self.output_gain = if gain.is_nan() {
            0.0
        } else {
            gain.clamp(0.0, MAX_OUTPUT_GAIN)
        };
        self
    }

    pub fn with_third_harmonic(mut self, amount: f64) -> Self {
        self.third_harmonic = amount;
        self
    }

    pub fn with_layout(mut self, layout: &'static HarmonicLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets how many samples a gain change is spread over. Zero makes
    /// changes take effect on the very next sample, at the cost of a click.
    pub fn with_gain_ramp(mut self, samples: u16) -> Self {
        self.gain_ramp = samples;
        self
    }
}
