//! Tonewheel - a real-time tonewheel organ synthesis engine
//!
//! This library models the tone generator of an electromechanical organ: 91
//! free-running tonewheels, mixed through nine drawbars per key into one
//! stream of 16-bit samples. The audio path is fixed-point and never
//! allocates, blocks or locks; drawbar and key changes arrive from other
//! threads through a lock-free `Controls` handle.
//!
//! # Examples
//!
//! ```
//! use tonewheel::{BlockSource, ToneGenerator};
//!
//! let mut organ = ToneGenerator::<44100>::new().unwrap();
//! let controls = organ.controls();
//!
//! // Control context
//! controls.set_registration("88 8000 000".parse().unwrap());
//! controls.press_key(24).unwrap();
//!
//! // Audio context
//! let mut block = [0i16; 128];
//! organ.fill(&mut block);
//! ```

pub mod common;
pub mod organ;
#[cfg(feature = "wav-writer")]
mod render;

// Re-export commonly used types at the crate root
pub use crate::common::{AudioSignal, BlockSource, Error, ParseRegistrationError, Signal};
pub use organ::{
    AUDIO_BLOCK_SAMPLES, BlockStream, Config, Controls, DEFAULT_GAIN_RAMP, HarmonicLayout,
    InterpolationMode, Registration, StartPhase, ToneGenerator, Tonewheel, Tuning,
};
#[cfg(feature = "wav-writer")]
pub use render::{render_into, render_wav};
#[cfg(feature = "macros")]
pub use tonewheel_macros::registration;
