//! Harmonic layout of a tonewheel organ.
//!
//! # Wheels
//!
//! The generator has 91 wheels covering seven and a half octaves from C1.
//! Wheel `w` plays note `w % 12` of octave `w / 12`. In a mechanical organ
//! every wheel of a note class is driven through the same gear pair, and
//! each octave doubles the number of teeth, so
//!
//! ```text
//! frequency(w) = motor_hz * ratio[w % 12] * 2^(w / 12 + 1)
//! ```
//!
//! With the standard 20 Hz drive shaft the gear ratios land within a few
//! cents of equal temperament, and wheel 45 is exactly 440 Hz.
//!
//! # Routing
//!
//! Each key of the manual taps nine wheels, one per drawbar. The drawbars
//! sit at fixed semitone offsets from the 8' (fundamental) pitch. Keys near
//! the top of the manual would need wheels that do not exist for the upper
//! drawbars; those fold back down by whole octaves onto the highest wheels
//! that do.
//!
//! The routing is a design constant, so it is computed in a `const fn` and
//! the standard layout is a `const` shared by `&'static` reference.

/// Number of tonewheels in the generator.
pub const WHEEL_COUNT: usize = 91;

/// Number of drawbars on the manual.
pub const DRAWBAR_COUNT: usize = 9;

/// Number of keys on the manual.
pub const KEY_COUNT: usize = 61;

/// Highest drawbar level.
pub const MAX_LEVEL: u8 = 8;

/// Index of the wheel tuned to A4.
pub const A4_WHEEL: usize = 45;

/// Drawbar footages, in the order the drawbars sit on the manual.
pub const FOOTAGES: [&str; DRAWBAR_COUNT] = [
    "16'", "5 1/3'", "8'", "4'", "2 2/3'", "2'", "1 3/5'", "1 1/3'", "1'",
];

/// Driving and driven teeth of the gear pair for each note class, C to B.
pub const GEAR_RATIOS: [(u16, u16); 12] = [
    (85, 104),
    (71, 82),
    (67, 73),
    (105, 108),
    (103, 100),
    (84, 77),
    (74, 64),
    (98, 80),
    (96, 74),
    (88, 64),
    (67, 46),
    (108, 70),
];

/// Semitone offset of each drawbar relative to the 8' fundamental.
pub const DRAWBAR_OFFSETS: [i8; DRAWBAR_COUNT] = [-12, 7, 0, 12, 19, 24, 28, 31, 36];

/// Attenuation per drawbar step below full, in decibels.
const DB_PER_STEP: f64 = 3.0;

/// How wheel frequencies are derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tuning {
    /// Gear-driven tuning from a drive shaft spinning at `motor_hz`.
    GearRatios { motor_hz: f64 },
    /// Twelve-tone equal temperament anchored at `a4_hz`.
    EqualTemperament { a4_hz: f64 },
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::GearRatios { motor_hz: 20.0 }
    }
}

/// The fixed harmonic design of a tonewheel generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarmonicLayout {
    gear_ratios: [(u16, u16); 12],
    routing: [[u8; DRAWBAR_COUNT]; KEY_COUNT],
}

impl HarmonicLayout {
    /// The classic layout: lowest key at C2 (8'), 16' reaching down to the
    /// first wheel.
    pub const STANDARD: HarmonicLayout = HarmonicLayout::new(GEAR_RATIOS, DRAWBAR_OFFSETS, 12);

    /// Builds a layout and its routing table.
    ///
    /// # Arguments
    ///
    /// * `gear_ratios` - Gear pair per note class; a zero denominator is
    ///   treated as one
    /// * `drawbar_offsets` - Semitone offset of each drawbar from 8'
    /// * `key_offset` - Wheel index of the lowest key's 8' pitch
    pub const fn new(
        gear_ratios: [(u16, u16); 12],
        drawbar_offsets: [i8; DRAWBAR_COUNT],
        key_offset: u8,
    ) -> Self {
        let mut routing = [[0u8; DRAWBAR_COUNT]; KEY_COUNT];

        let mut key = 0;
        while key < KEY_COUNT {
            let mut drawbar = 0;
            while drawbar < DRAWBAR_COUNT {
                let mut wheel = key as i32 + key_offset as i32 + drawbar_offsets[drawbar] as i32;
                while wheel >= WHEEL_COUNT as i32 {
                    wheel -= 12;
                }
                while wheel < 0 {
                    wheel += 12;
                }
                routing[key][drawbar] = wheel as u8;
                drawbar += 1;
            }
            key += 1;
        }

        Self {
            gear_ratios,
            routing,
        }
    }

    /// Frequency of a wheel in Hz under the given tuning.
    pub fn wheel_frequency(&self, wheel: usize, tuning: Tuning) -> f64 {
        match tuning {
            Tuning::GearRatios { motor_hz } => {
                let (driving, driven) = self.gear_ratios[wheel % 12];
                let ratio = f64::from(driving) / f64::from(driven.max(1));
                let teeth = f64::from(2u32 << (wheel / 12));
                motor_hz * ratio * teeth
            }
            Tuning::EqualTemperament { a4_hz } => {
                let semitones = wheel as f64 - A4_WHEEL as f64;
                a4_hz * 2.0_f64.powf(semitones / 12.0)
            }
        }
    }

    /// Wheel sounded by `key` through `drawbar`, if both are in range.
    pub fn route(&self, key: usize, drawbar: usize) -> Option<usize> {
        self.routing
            .get(key)
            .and_then(|taps| taps.get(drawbar))
            .map(|&wheel| wheel as usize)
    }

    /// The nine wheels tapped by each key.
    pub fn routing(&self) -> &[[u8; DRAWBAR_COUNT]; KEY_COUNT] {
        &self.routing
    }
}

impl Default for HarmonicLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Q12 gain for each drawbar level.
///
/// Level 0 is silent, level 8 is unity and every step in between drops by
/// about 3 dB.
pub fn level_gains() -> [u32; MAX_LEVEL as usize + 1] {
    let mut gains = [0u32; MAX_LEVEL as usize + 1];
    for (level, gain) in gains.iter_mut().enumerate().skip(1) {
        let steps_down = f64::from(MAX_LEVEL) - level as f64;
        let linear = 10.0_f64.powf(-DB_PER_STEP * steps_down / 20.0);
        *gain = crate::common::fixed::gain_to_q12(linear);
    }
    gains
}
