//! Error types for the tone generator.

use std::collections::TryReserveError;

use snafu::Snafu;

/// Errors raised by construction and by the control path.
///
/// The audio path (`fill`) has no error type: it is total over any state
/// reachable through the public API.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to allocate tone generator state"))]
    OutOfMemory { source: TryReserveError },

    #[snafu(display("Drawbar channel {} is out of range (0..{})", channel, count))]
    InvalidChannel { channel: usize, count: usize },

    #[snafu(display("Key {} is outside the {}-key manual", key, count))]
    InvalidKey { key: usize, count: usize },

    /// Raised by the `wav-writer` renderers; the source is the boxed
    /// `hound::Error`.
    #[snafu(display("Failed to write WAV output"))]
    Wav {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors from parsing a drawbar registration string.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseRegistrationError {
    #[snafu(display("Input string is empty"))]
    Empty,

    #[snafu(display("Expected {} drawbar levels, found {}", expected, found))]
    WrongLength { expected: usize, found: usize },

    #[snafu(display("Invalid drawbar level {:?}", level))]
    InvalidLevel { level: char },
}
