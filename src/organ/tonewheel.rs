//! A single tonewheel: a free-running phase accumulator.

/// Number of phase steps in one waveform period (2^32).
pub const PHASE_PERIOD: f64 = 4_294_967_296.0;

/// A free-running oscillator with a fixed frequency.
///
/// The phase is an unsigned 32-bit fraction of one period, so it always sits
/// inside the period and wraps with plain wrapping arithmetic. The step is
/// set once at construction; a tonewheel never changes pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tonewheel {
    phase: u32,
    step: u32,
}

impl Tonewheel {
    /// Creates a tonewheel spinning at `frequency` Hz, starting at phase zero.
    ///
    /// Frequencies at or above the sample rate are not representable and
    /// saturate at the largest step; negative frequencies stand still.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonewheel::Tonewheel;
    ///
    /// let wheel = Tonewheel::new(440.0, 44100);
    /// assert!((wheel.frequency(44100) - 440.0).abs() < 0.001);
    /// ```
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        let step = (frequency / f64::from(sample_rate) * PHASE_PERIOD).round();
        let step = if step.is_nan() || step <= 0.0 {
            0
        } else if step >= u32::MAX as f64 {
            u32::MAX
        } else {
            step as u32
        };
        Self::from_step(step)
    }

    /// Creates a tonewheel that advances by `step` per sample.
    pub const fn from_step(step: u32) -> Self {
        Self { phase: 0, step }
    }

    /// Builder-style method to set the starting phase.
    pub const fn with_phase(mut self, phase: u32) -> Self {
        self.phase = phase;
        self
    }

    /// Advances by one sample and returns the new phase.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.phase = self.phase.wrapping_add(self.step);
        self.phase
    }

    /// Current phase.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Phase increment per sample.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Frequency in Hz at the given sample rate.
    pub fn frequency(&self, sample_rate: u32) -> f64 {
        f64::from(self.step) * f64::from(sample_rate) / PHASE_PERIOD
    }
}
