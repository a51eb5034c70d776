//! Drawbar registrations.

use std::fmt;
use std::str::FromStr;

use snafu::ensure;

use super::layout::{DRAWBAR_COUNT, MAX_LEVEL};
use crate::common::{EmptySnafu, InvalidLevelSnafu, ParseRegistrationError, WrongLengthSnafu};

/// Bits used per drawbar in the packed form.
const LEVEL_BITS: u32 = 4;
const LEVEL_MASK: u64 = (1 << LEVEL_BITS) - 1;

/// The levels of all nine drawbars, from 16' to 1'.
///
/// Organists write registrations as nine digits grouped by function:
/// sub-octaves, fundamentals and mixtures, e.g. `"88 8000 000"`. That is
/// the format accepted by `FromStr` and produced by `Display`. Parsing
/// ignores surrounding whitespace, and spaces or dashes between digits.
///
/// # Examples
///
/// ```
/// use tonewheel::Registration;
///
/// let reg: Registration = "88 8000 000".parse().unwrap();
/// assert_eq!(reg.levels(), [8, 8, 8, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(reg.to_string(), "88 8000 000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Registration([u8; DRAWBAR_COUNT]);

impl Registration {
    /// All drawbars pushed in.
    pub const SILENT: Registration = Registration([0; DRAWBAR_COUNT]);

    /// All drawbars pulled out.
    pub const FULL: Registration = Registration([MAX_LEVEL; DRAWBAR_COUNT]);

    /// Creates a registration, clamping each level to `0..=8`.
    pub const fn new(levels: [u8; DRAWBAR_COUNT]) -> Self {
        let mut clamped = levels;
        let mut i = 0;
        while i < DRAWBAR_COUNT {
            if clamped[i] > MAX_LEVEL {
                clamped[i] = MAX_LEVEL;
            }
            i += 1;
        }
        Self(clamped)
    }

    /// Levels from 16' to 1'.
    pub fn levels(&self) -> [u8; DRAWBAR_COUNT] {
        self.0
    }

    /// Level of one drawbar, or `None` if `drawbar` is out of range.
    pub fn level(&self, drawbar: usize) -> Option<u8> {
        self.0.get(drawbar).copied()
    }

    /// Builder-style method to change one drawbar. Out-of-range drawbars
    /// are ignored and levels are clamped.
    pub fn with_level(mut self, drawbar: usize, level: u8) -> Self {
        if let Some(slot) = self.0.get_mut(drawbar) {
            *slot = level.min(MAX_LEVEL);
        }
        self
    }

    /// Returns true if every drawbar is at zero.
    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|&level| level == 0)
    }

    /// Packs the registration into one word, four bits per drawbar.
    pub const fn pack(&self) -> u64 {
        let mut bits = 0u64;
        let mut i = 0;
        while i < DRAWBAR_COUNT {
            bits |= (self.0[i] as u64) << (i as u32 * LEVEL_BITS);
            i += 1;
        }
        bits
    }

    /// Inverse of `pack`. Nibbles above 8 are clamped.
    pub const fn unpack(bits: u64) -> Self {
        let mut levels = [0u8; DRAWBAR_COUNT];
        let mut i = 0;
        while i < DRAWBAR_COUNT {
            levels[i] = ((bits >> (i as u32 * LEVEL_BITS)) & LEVEL_MASK) as u8;
            i += 1;
        }
        Self::new(levels)
    }

    /// Returns `bits` with one drawbar's nibble replaced.
    pub(crate) fn repack(bits: u64, drawbar: usize, level: u8) -> u64 {
        let shift = drawbar as u32 * LEVEL_BITS;
        (bits & !(LEVEL_MASK << shift)) | (u64::from(level.min(MAX_LEVEL)) << shift)
    }
}

impl From<[u8; DRAWBAR_COUNT]> for Registration {
    fn from(levels: [u8; DRAWBAR_COUNT]) -> Self {
        Self::new(levels)
    }
}

impl FromStr for Registration {
    type Err = ParseRegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<char> = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        ensure!(!digits.is_empty(), EmptySnafu);
        ensure!(
            digits.len() == DRAWBAR_COUNT,
            WrongLengthSnafu {
                expected: DRAWBAR_COUNT,
                found: digits.len(),
            }
        );

        let mut levels = [0u8; DRAWBAR_COUNT];
        for (slot, c) in levels.iter_mut().zip(digits) {
            *slot = match c.to_digit(10) {
                Some(level) if level <= u32::from(MAX_LEVEL) => level as u8,
                _ => return InvalidLevelSnafu { level: c }.fail(),
            };
        }

        Ok(Self(levels))
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g, h, i, j] = self.0;
        write!(f, "{}{} {}{}{}{} {}{}{}", a, b, c, d, e, g, h, i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let reg = Registration::new([9, 200, 8, 0, 1, 2, 3, 4, 5]);
        assert_eq!(reg.levels(), [8, 8, 8, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_and_display() {
        let reg: Registration = "00 8800 000".parse().unwrap();
        assert_eq!(reg.level(2), Some(8));
        assert_eq!(reg.level(3), Some(8));
        assert_eq!(reg.to_string(), "00 8800 000");

        let dashed: Registration = "00-8800-000".parse().unwrap();
        assert_eq!(reg, dashed);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let reg: Registration = " 888000000\t".parse().unwrap();
        assert_eq!(reg, Registration::new([8, 8, 8, 0, 0, 0, 0, 0, 0]));
        assert_eq!(
            "888\t000000".parse::<Registration>(),
            Err(ParseRegistrationError::WrongLength {
                expected: 9,
                found: 10
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "".parse::<Registration>(),
            Err(ParseRegistrationError::Empty)
        );
        assert_eq!(
            "888".parse::<Registration>(),
            Err(ParseRegistrationError::WrongLength {
                expected: 9,
                found: 3
            })
        );
        assert_eq!(
            "88 8000 009".parse::<Registration>(),
            Err(ParseRegistrationError::InvalidLevel { level: '9' })
        );
    }

    #[test]
    fn test_pack_unpack() {
        let reg = Registration::new([1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(Registration::unpack(reg.pack()), reg);
        assert_eq!(Registration::SILENT.pack(), 0);
    }

    #[test]
    fn test_repack_touches_one_drawbar() {
        let bits = Registration::FULL.pack();
        let bits = Registration::repack(bits, 4, 0);
        assert_eq!(
            Registration::unpack(bits).levels(),
            [8, 8, 8, 8, 0, 8, 8, 8, 8]
        );
        let bits = Registration::repack(bits, 4, 99);
        assert_eq!(Registration::unpack(bits), Registration::FULL);
    }

    #[test]
    fn test_with_level_ignores_bad_drawbar() {
        let reg = Registration::SILENT.with_level(12, 8).with_level(0, 3);
        assert_eq!(reg.levels(), [3, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!reg.is_silent());
        assert!(Registration::SILENT.is_silent());
    }
}
