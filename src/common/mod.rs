//! Signal traits, errors and fixed-point helpers.
//!
//! This module provides the abstractions shared by the rest of the crate:
//! - `Signal` trait for floating-point sample generation
//! - `AudioSignal` trait for sample-rate-aware signals
//! - `BlockSource` trait for fixed-point block fills
//! - Error types and fixed-point helpers

mod audio;
mod error;
pub mod fixed;
mod signal;

pub use audio::AudioSignal;
pub use error::{Error, ParseRegistrationError};
pub(crate) use error::{
    EmptySnafu, InvalidChannelSnafu, InvalidKeySnafu, InvalidLevelSnafu, OutOfMemorySnafu,
    WrongLengthSnafu,
};
#[cfg(feature = "wav-writer")]
pub(crate) use error::WavSnafu;
pub use signal::{BlockSource, Signal};
