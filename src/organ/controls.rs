//! Lock-free control surface shared between the control and audio contexts.
//!
//! The control context (UI, MIDI translation, a script) writes drawbar
//! levels and key state; the audio context reads them once at the start of
//! every fill. Both pieces of state are packed into single atomic words:
//! - all nine drawbar levels, four bits each, in one `AtomicU64`
//! - the 61 keys of the manual as a bitmask in another `AtomicU64`
//!
//! A reader therefore always observes a complete registration, never one
//! with some drawbars updated and others not. The audio context never
//! waits on the control context.
//!
//! All atomics use `Ordering::Relaxed`: each word is self-contained and no
//! other memory is published through it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{trace, warn};

use super::layout::{DRAWBAR_COUNT, KEY_COUNT, MAX_LEVEL};
use super::registration::Registration;
use crate::common::{Error, InvalidChannelSnafu, InvalidKeySnafu};

#[derive(Debug)]
struct Shared {
    drawbars: AtomicU64,
    keys: AtomicU64,
}

/// A point-in-time copy of the control state, as read by the audio context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub drawbars: u64,
    pub keys: u64,
}

impl Snapshot {
    pub fn registration(&self) -> Registration {
        Registration::unpack(self.drawbars)
    }

    /// Indices of the keys held down, lowest first.
    pub fn pressed_keys(&self) -> impl Iterator<Item = usize> + '_ {
        (0..KEY_COUNT).filter(|&key| self.keys & (1 << key) != 0)
    }
}

/// Handle for changing drawbars and keys from any thread.
///
/// Cloning is cheap; every clone talks to the same generator.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use tonewheel::{BlockSource, ToneGenerator};
///
/// let mut organ = ToneGenerator::<44100>::new().unwrap();
/// let controls = organ.controls();
///
/// thread::spawn(move || {
///     controls.press_key(24).unwrap();
///     controls.set_volume(2, 8).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// let mut block = [0i16; 128];
/// organ.fill(&mut block);
/// assert!(block.iter().any(|&s| s != 0));
/// ```
#[derive(Debug, Clone)]
pub struct Controls {
    shared: Arc<Shared>,
}

impl Controls {
    pub(crate) fn new(registration: Registration) -> Self {
        Self {
            shared: Arc::new(Shared {
                drawbars: AtomicU64::new(registration.pack()),
                keys: AtomicU64::new(0),
            }),
        }
    }

    /// Sets one drawbar's level.
    ///
    /// Levels above 8 are clamped to 8, the way a physical drawbar simply
    /// stops at its end.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidChannel` if `drawbar` is not in `0..9`; no
    /// drawbar is changed.
    pub fn set_volume(&self, drawbar: usize, volume: u8) -> Result<(), Error> {
        check_channel(drawbar)?;

        let volume = volume.min(MAX_LEVEL);
        // Closure never returns None, so the update always succeeds
        let _ = self
            .shared
            .drawbars
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some(Registration::repack(bits, drawbar, volume))
            });

        trace!("drawbar {} set to {}", drawbar, volume);
        Ok(())
    }

    /// Current level of one drawbar.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidChannel` if `drawbar` is not in `0..9`.
    pub fn volume(&self, drawbar: usize) -> Result<u8, Error> {
        check_channel(drawbar)?;
        Ok(self.registration().levels()[drawbar])
    }

    /// Replaces all nine drawbar levels in a single step.
    pub fn set_registration(&self, registration: Registration) {
        self.shared
            .drawbars
            .store(registration.pack(), Ordering::Relaxed);
        trace!("registration set to {}", registration);
    }

    /// Current drawbar levels.
    pub fn registration(&self) -> Registration {
        Registration::unpack(self.shared.drawbars.load(Ordering::Relaxed))
    }

    /// Holds down a key of the manual.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` if `key` is not in `0..61`.
    pub fn press_key(&self, key: usize) -> Result<(), Error> {
        check_key(key)?;
        self.shared.keys.fetch_or(1 << key, Ordering::Relaxed);
        Ok(())
    }

    /// Lets go of a key of the manual.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` if `key` is not in `0..61`.
    pub fn release_key(&self, key: usize) -> Result<(), Error> {
        check_key(key)?;
        self.shared.keys.fetch_and(!(1 << key), Ordering::Relaxed);
        Ok(())
    }

    /// Lets go of every key.
    pub fn release_all(&self) {
        self.shared.keys.store(0, Ordering::Relaxed);
    }

    /// Returns true if `key` is held down. Out-of-range keys are never down.
    pub fn is_key_down(&self, key: usize) -> bool {
        key < KEY_COUNT && self.shared.keys.load(Ordering::Relaxed) & (1 << key) != 0
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            drawbars: self.shared.drawbars.load(Ordering::Relaxed),
            keys: self.shared.keys.load(Ordering::Relaxed),
        }
    }
}

fn check_channel(channel: usize) -> Result<(), Error> {
    if channel >= DRAWBAR_COUNT {
        warn!("ignoring out-of-range drawbar channel {}", channel);
        return InvalidChannelSnafu {
            channel,
            count: DRAWBAR_COUNT,
        }
        .fail();
    }
    Ok(())
}

fn check_key(key: usize) -> Result<(), Error> {
    if key >= KEY_COUNT {
        warn!("ignoring out-of-range key {}", key);
        return InvalidKeySnafu {
            key,
            count: KEY_COUNT,
        }
        .fail();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_volume_clamps() {
        let controls = Controls::new(Registration::SILENT);
        controls.set_volume(3, 200).unwrap();
        assert_eq!(controls.volume(3).unwrap(), 8);
    }

    #[test]
    fn test_invalid_channel_changes_nothing() {
        let controls = Controls::new(Registration::FULL);
        let err = controls.set_volume(999, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidChannel {
                channel: 999,
                count: 9
            }
        ));
        assert_eq!(controls.registration(), Registration::FULL);
        assert!(controls.volume(9).is_err());
    }

    #[test]
    fn test_keys() {
        let controls = Controls::new(Registration::SILENT);
        controls.press_key(0).unwrap();
        controls.press_key(60).unwrap();
        assert!(controls.is_key_down(0));
        assert!(controls.is_key_down(60));
        assert!(!controls.is_key_down(30));
        assert!(!controls.is_key_down(64));

        let pressed: Vec<usize> = controls.snapshot().pressed_keys().collect();
        assert_eq!(pressed, vec![0, 60]);

        controls.release_key(0).unwrap();
        assert!(!controls.is_key_down(0));

        controls.release_all();
        assert_eq!(controls.snapshot().keys, 0);
    }

    #[test]
    fn test_invalid_key() {
        let controls = Controls::new(Registration::SILENT);
        assert!(matches!(
            controls.press_key(61),
            Err(Error::InvalidKey { key: 61, count: 61 })
        ));
        assert!(controls.release_key(100).is_err());
        assert_eq!(controls.snapshot().keys, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let controls = Controls::new(Registration::SILENT);
        let other = controls.clone();
        other.set_registration(Registration::FULL);
        assert_eq!(controls.registration(), Registration::FULL);
        assert_eq!(controls.snapshot().registration(), Registration::FULL);
    }
}
