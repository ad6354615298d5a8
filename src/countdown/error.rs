//! Countdown error types.
//!
//! Every refusal leaves the countdown unchanged, so callers that only care
//! about the state machine may ignore these values.

use thiserror::Error;

use crate::types::CountdownState;

/// Errors returned by countdown operations and configuration checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    /// `start()` was called with nothing to count down.
    #[error("countdown duration must be greater than zero")]
    ZeroDuration,

    /// The operation is only allowed while the countdown is reset.
    #[error("countdown is {0}; reset it first")]
    NotReset(CountdownState),

    /// A countdown cannot tick with a zero interval.
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    /// The configured cadence is outside the smooth-display range.
    #[error("configured tick interval must be between 1 and 100 ms, got {0} ms")]
    InvalidTickInterval(u64),

    /// Minutes outside the picker range.
    #[error("minutes must be between 0 and 60, got {0}")]
    MinutesOutOfRange(u32),

    /// Seconds outside the picker range.
    #[error("seconds must be between 0 and 59, got {0}")]
    SecondsOutOfRange(u32),
}

impl CountdownError {
    /// Returns true if this error rejected a state transition rather than
    /// bad input.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::ZeroDuration | Self::NotReset(_))
    }
}
