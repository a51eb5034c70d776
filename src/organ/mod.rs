//! The tonewheel organ engine.
//!
//! This module contains the generator and everything it is built from:
//! - `HarmonicLayout`: wheel tuning and key/drawbar routing
//! - `Tonewheel`: a single phase accumulator
//! - `Wavetable`: the shared quasi-sine waveform
//! - `Registration` and `Controls`: drawbar and key state
//! - `ToneGenerator`: the mixer tying them together
//! - `BlockStream`: block-at-a-time pulling for host graphs

mod block;
mod config;
mod controls;
mod generator;
pub mod layout;
mod registration;
mod tonewheel;
mod wavetable;

pub use block::{AUDIO_BLOCK_SAMPLES, BlockStream};
pub use config::{Config, DEFAULT_GAIN_RAMP, MAX_OUTPUT_GAIN, StartPhase};
pub use controls::Controls;
pub use generator::ToneGenerator;
pub use layout::{HarmonicLayout, Tuning};
pub use registration::Registration;
pub use tonewheel::Tonewheel;
pub use wavetable::{InterpolationMode, Wavetable};
