//! The tonewheel tone generator.
//!
//! # Design Overview
//!
//! `ToneGenerator` owns 91 tonewheels and mixes them into one mono stream of
//! 16-bit samples. Which wheels are heard, and how loud, follows from two
//! pieces of control state (see `Controls`): the nine drawbar levels and the
//! set of keys held down.
//!
//! ## Per-block work
//!
//! At the start of every fill the generator takes one snapshot of the
//! control state. If it differs from the last one, each wheel's target gain
//! is rebuilt by walking every held key's nine taps and adding the gain of
//! that drawbar's level.
//!
//! Wheel gains never jump to a new target. They glide there in equal integer
//! steps over `Config::gain_ramp` samples, and land exactly on the target at
//! the end. The ramp carries across fill boundaries, so splitting a fill in
//! two gives the same samples as one larger fill.
//!
//! ## Per-sample work
//!
//! 1. While a ramp is running, every wheel gain takes one step
//! 2. Every wheel advances its phase accumulator
//! 3. Wheels with a non-zero gain read the shared wavetable at their phase
//! 4. Each reading is weighted by the wheel's gain and summed in 64 bits
//! 5. The sum is scaled by the output gain and saturated to `i16`
//!
//! The work per sample is bounded by the wheel count, and nothing on this
//! path allocates, locks or logs. Every buffer is reserved at construction.

use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use snafu::ResultExt;

use super::config::{Config, MAX_OUTPUT_GAIN, StartPhase};
use super::controls::{Controls, Snapshot};
use super::layout::{DRAWBAR_COUNT, HarmonicLayout, MAX_LEVEL, WHEEL_COUNT, level_gains};
use super::registration::Registration;
use super::tonewheel::Tonewheel;
use super::wavetable::{InterpolationMode, Wavetable};
use crate::common::fixed::{GAIN_BITS, gain_to_q12, q15_to_f64, saturate};
use crate::common::{AudioSignal, BlockSource, Error, OutOfMemorySnafu, Signal};

/// Samples rendered per chunk when producing floating-point output.
const FLOAT_CHUNK: usize = 64;

/// A tonewheel organ generator.
///
/// # Type Parameters
///
/// * `SAMPLE_RATE` - Sample rate in Hz (e.g., 44100 for CD quality)
///
/// # Examples
///
/// ```
/// use tonewheel::{BlockSource, ToneGenerator};
///
/// let mut organ = ToneGenerator::<44100>::new().unwrap();
/// organ.set_registration("88 8000 000".parse().unwrap());
/// organ.press_key(24).unwrap();
///
/// let mut block = [0i16; 128];
/// organ.fill(&mut block);
/// ```
pub struct ToneGenerator<const SAMPLE_RATE: u32> {
    wheels: Vec<Tonewheel>,
    /// Q12 gain of each wheel at the current sample
    gains: Vec<i32>,
    /// Q12 gain each wheel is heading to
    target_gains: Vec<i32>,
    /// Per-sample gain change while a ramp runs
    ramp_steps: Vec<i32>,
    gain_ramp: u16,
    /// Samples left in the current ramp
    ramp_left: u16,
    table: Wavetable,
    layout: &'static HarmonicLayout,
    level_gains: [u32; MAX_LEVEL as usize + 1],
    interpolation: InterpolationMode,
    /// Q12
    output_gain: i64,
    controls: Controls,
    applied: Option<Snapshot>,
}

impl<const SAMPLE_RATE: u32> ToneGenerator<SAMPLE_RATE> {
    /// Creates a generator with the default configuration: gear-ratio
    /// tuning, wheels at phase zero and all drawbars in.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the generator state cannot be
    /// allocated.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(Config::default())
    }

    /// Creates a generator from `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the generator state cannot be
    /// allocated.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        let table = Wavetable::quasi_sine(config.third_harmonic).context(OutOfMemorySnafu)?;

        let mut rng = match config.start_phase {
            StartPhase::Zero => None,
            StartPhase::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        };

        let mut wheels = Vec::new();
        wheels
            .try_reserve_exact(WHEEL_COUNT)
            .context(OutOfMemorySnafu)?;
        for wheel in 0..WHEEL_COUNT {
            let frequency = config.layout.wheel_frequency(wheel, config.tuning);
            let phase = rng.as_mut().map_or(0, |rng| rng.next_u32());
            wheels.push(Tonewheel::new(frequency, SAMPLE_RATE).with_phase(phase));
        }

        let gains = zeroed_gains()?;
        let target_gains = zeroed_gains()?;
        let ramp_steps = zeroed_gains()?;

        let output_gain = if config.output_gain.is_nan() {
            0.0
        } else {
            config.output_gain.clamp(0.0, MAX_OUTPUT_GAIN)
        };

        debug!(
            "tone generator ready: {} wheels at {} Hz, {:?}, start phase {:?}, registration {}",
            WHEEL_COUNT, SAMPLE_RATE, config.tuning, config.start_phase, config.registration
        );

        Ok(Self {
            wheels,
            gains,
            target_gains,
            ramp_steps,
            gain_ramp: config.gain_ramp,
            ramp_left: 0,
            table,
            layout: config.layout,
            level_gains: level_gains(),
            interpolation: config.interpolation,
            output_gain: i64::from(gain_to_q12(output_gain)),
            controls: Controls::new(config.registration),
            applied: None,
        })
    }

    /// Returns a handle for changing drawbars and keys from another thread.
    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    /// Sets one drawbar's level; see `Controls::set_volume`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidChannel` if `drawbar` is not in `0..9`.
    pub fn set_volume(&self, drawbar: usize, volume: u8) -> Result<(), Error> {
        self.controls.set_volume(drawbar, volume)
    }

    /// Replaces all drawbar levels at once.
    pub fn set_registration(&self, registration: Registration) {
        self.controls.set_registration(registration);
    }

    /// Current drawbar levels.
    pub fn registration(&self) -> Registration {
        self.controls.registration()
    }

    /// Holds down a key; see `Controls::press_key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` if `key` is not in `0..61`.
    pub fn press_key(&self, key: usize) -> Result<(), Error> {
        self.controls.press_key(key)
    }

    /// Lets go of a key; see `Controls::release_key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` if `key` is not in `0..61`.
    pub fn release_key(&self, key: usize) -> Result<(), Error> {
        self.controls.release_key(key)
    }

    /// The wheel bank, in wheel order.
    pub fn wheels(&self) -> &[Tonewheel] {
        &self.wheels
    }

    /// The harmonic layout this generator was built with.
    pub fn layout(&self) -> &'static HarmonicLayout {
        self.layout
    }

    /// Rebuilds the per-wheel target gains if the control state changed,
    /// and starts a ramp from the current gains towards them.
    fn apply_controls(&mut self) {
        let snapshot = self.controls.snapshot();
        if self.applied == Some(snapshot) {
            return;
        }

        let levels = snapshot.registration().levels();
        let mut drawbar_gains = [0i32; DRAWBAR_COUNT];
        for (gain, &level) in drawbar_gains.iter_mut().zip(levels.iter()) {
            // Level gains are at most unity (4096)
            *gain = self.level_gains[level as usize] as i32;
        }

        self.target_gains.fill(0);
        for key in snapshot.pressed_keys() {
            for (&wheel, &gain) in self.layout.routing()[key].iter().zip(drawbar_gains.iter()) {
                self.target_gains[wheel as usize] += gain;
            }
        }

        if self.gain_ramp == 0 {
            self.gains.copy_from_slice(&self.target_gains);
            self.ramp_left = 0;
        } else {
            let length = i32::from(self.gain_ramp);
            for ((step, &gain), &target) in self
                .ramp_steps
                .iter_mut()
                .zip(self.gains.iter())
                .zip(self.target_gains.iter())
            {
                *step = (target - gain) / length;
            }
            self.ramp_left = self.gain_ramp;
        }

        self.applied = Some(snapshot);
    }

    /// Moves every wheel gain one sample further along the ramp. The last
    /// sample of a ramp lands exactly on the targets.
    fn step_ramp(&mut self) {
        self.ramp_left -= 1;
        if self.ramp_left == 0 {
            self.gains.copy_from_slice(&self.target_gains);
        } else {
            for (gain, &step) in self.gains.iter_mut().zip(self.ramp_steps.iter()) {
                *gain += step;
            }
        }
    }
}

impl<const SAMPLE_RATE: u32> BlockSource for ToneGenerator<SAMPLE_RATE> {
    fn fill(&mut self, block: &mut [i16]) {
        self.apply_controls();

        let interpolation = self.interpolation;
        for out in block.iter_mut() {
            if self.ramp_left > 0 {
                self.step_ramp();
            }

            let mut mix: i64 = 0;
            for (wheel, &gain) in self.wheels.iter_mut().zip(self.gains.iter()) {
                let phase = wheel.advance();
                if gain != 0 {
                    let value = self.table.lookup(phase, interpolation);
                    mix += i64::from(value) * i64::from(gain);
                }
            }
            *out = saturate(((mix >> GAIN_BITS) * self.output_gain) >> GAIN_BITS);
        }
    }
}

fn zeroed_gains() -> Result<Vec<i32>, Error> {
    let mut gains = Vec::new();
    gains.try_reserve_exact(WHEEL_COUNT).context(OutOfMemorySnafu)?;
    gains.resize(WHEEL_COUNT, 0);
    Ok(gains)
}

impl<const SAMPLE_RATE: u32> Signal for ToneGenerator<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let mut sample = [0i16; 1];
        self.fill(&mut sample);
        q15_to_f64(sample[0])
    }

    fn process(&mut self, buffer: &mut [f64]) {
        let mut chunk = [0i16; FLOAT_CHUNK];
        for out in buffer.chunks_mut(FLOAT_CHUNK) {
            let rendered = &mut chunk[..out.len()];
            self.fill(rendered);
            for (dst, &src) in out.iter_mut().zip(rendered.iter()) {
                *dst = q15_to_f64(src);
            }
        }
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for ToneGenerator<SAMPLE_RATE> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn organ() -> ToneGenerator<44100> {
        ToneGenerator::new().unwrap()
    }

    #[test]
    fn test_wheels_start_at_zero() {
        let organ = organ();
        assert_eq!(organ.wheels().len(), WHEEL_COUNT);
        assert!(organ.wheels().iter().all(|w| w.phase() == 0));
    }

    #[test]
    fn test_wheel_frequencies_follow_layout() {
        let organ = organ();
        let a4 = organ.wheels()[45].frequency(44100);
        assert!((a4 - 440.0).abs() < 0.001);
    }

    #[test]
    fn test_random_start_phase_is_deterministic() {
        let config = Config::default().with_start_phase(StartPhase::Random { seed: 42 });
        let a = ToneGenerator::<44100>::with_config(config.clone()).unwrap();
        let b = ToneGenerator::<44100>::with_config(config).unwrap();
        assert_eq!(a.wheels(), b.wheels());
        assert!(a.wheels().iter().any(|w| w.phase() != 0));
    }

    #[test]
    fn test_silent_by_default() {
        let mut organ = organ();
        organ.press_key(30).unwrap();
        let mut block = [1i16; 64];
        organ.fill(&mut block);
        assert!(block.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_no_keys_no_sound() {
        let mut organ = organ();
        organ.set_registration(Registration::FULL);
        let mut block = [1i16; 64];
        organ.fill(&mut block);
        assert!(block.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_single_drawbar_gains() {
        let mut organ = organ();
        organ.set_volume(2, 8).unwrap();
        organ.press_key(0).unwrap();
        organ.apply_controls();
        // 8' of the lowest key is wheel 12, at unity
        for (wheel, &gain) in organ.target_gains.iter().enumerate() {
            if wheel == 12 {
                assert_eq!(gain, 4096);
            } else {
                assert_eq!(gain, 0);
            }
        }
    }

    #[test]
    fn test_shared_wheels_accumulate() {
        let mut organ = organ();
        organ.set_registration(Registration::new([8, 0, 8, 0, 0, 0, 0, 0, 0]));
        // 8' of key 0 and 16' of key 12 both tap wheel 12
        organ.press_key(0).unwrap();
        organ.press_key(12).unwrap();
        organ.apply_controls();
        assert_eq!(organ.target_gains[12], 2 * 4096);
        assert_eq!(organ.target_gains[0], 4096);
        assert_eq!(organ.target_gains[24], 4096);
    }

    #[test]
    fn test_gains_ramp_to_target() {
        let mut organ = organ();
        organ.set_volume(2, 8).unwrap();
        organ.press_key(0).unwrap();

        let mut block = [0i16; 16];
        organ.fill(&mut block);
        assert_eq!(organ.gains[12], 16 * (4096 / 64));

        let mut rest = [0i16; 48];
        organ.fill(&mut rest);
        assert_eq!(organ.gains, organ.target_gains);
        assert_eq!(organ.ramp_left, 0);
    }

    #[test]
    fn test_ramp_restarts_from_current_gain() {
        let mut organ = organ();
        organ.set_volume(2, 8).unwrap();
        organ.press_key(0).unwrap();
        let mut block = [0i16; 32];
        organ.fill(&mut block);
        assert_eq!(organ.gains[12], 2048);

        // Pushed back in halfway up: glide down from where the gain is now
        organ.set_volume(2, 0).unwrap();
        organ.fill(&mut block[..1]);
        assert_eq!(organ.gains[12], 2048 - 2048 / 64);

        let mut rest = [0i16; 63];
        organ.fill(&mut rest);
        assert_eq!(organ.gains[12], 0);
    }

    #[test]
    fn test_zero_ramp_switches_at_once() {
        let config = Config::default().with_gain_ramp(0);
        let mut organ = ToneGenerator::<44100>::with_config(config).unwrap();
        organ.set_volume(2, 8).unwrap();
        organ.press_key(0).unwrap();
        organ.fill(&mut [0i16; 1]);
        assert_eq!(organ.gains[12], 4096);
    }

    #[test]
    fn test_sine_amplitude() {
        let mut organ = organ();
        organ.set_volume(2, 8).unwrap();
        organ.press_key(33).unwrap(); // A4 at 8'
        let mut block = vec![0i16; 4410];
        organ.fill(&mut block);
        let peak = block.iter().map(|s| s.unsigned_abs()).max().unwrap();
        // Full-scale wheel at unity drawbar through 0.125 output gain
        assert!((4000..=4096).contains(&peak), "peak {}", peak);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let config = Config::default()
            .with_registration(Registration::FULL)
            .with_output_gain(MAX_OUTPUT_GAIN);
        let mut organ = ToneGenerator::<44100>::with_config(config).unwrap();
        for key in 0..61 {
            organ.press_key(key).unwrap();
        }
        let mut block = vec![0i16; 2048];
        organ.fill(&mut block);
        assert!(block.contains(&i16::MAX));
        assert!(block.contains(&i16::MIN));
    }

    #[test]
    fn test_float_output_matches_fixed() {
        let config = Config::default().with_registration(Registration::FULL);
        let mut fixed = ToneGenerator::<44100>::with_config(config.clone()).unwrap();
        let mut float = ToneGenerator::<44100>::with_config(config).unwrap();
        fixed.press_key(20).unwrap();
        float.press_key(20).unwrap();

        let mut ints = vec![0i16; 200];
        fixed.fill(&mut ints);
        let mut floats = vec![0.0; 200];
        float.process(&mut floats);

        for (&i, &f) in ints.iter().zip(floats.iter()) {
            assert_eq!(f, f64::from(i) / 32768.0);
        }
        assert_eq!(float.next_sample(), {
            let mut one = [0i16; 1];
            fixed.fill(&mut one);
            f64::from(one[0]) / 32768.0
        });
    }

    #[test]
    fn test_sample_rate() {
        let organ = ToneGenerator::<48000>::new().unwrap();
        assert_eq!(organ.sample_rate(), 48000.0);
    }
}
