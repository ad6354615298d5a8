//! Countdown Timer Library
//!
//! This library provides the core functionality for the countdown CLI.
//! It includes:
//! - The `Countdown` state machine and its observer interface
//! - Type definitions for state, picker input and configuration
//! - The terminal screen, time formatting and command parsing

pub mod cli;
pub mod countdown;
pub mod types;

// Re-export commonly used types for convenience
pub use cli::format_time_span;
pub use countdown::{Countdown, CountdownError, CountdownObserver, MockCountdownObserver};
pub use types::{
    CountdownConfig, CountdownEvent, CountdownState, OutputFormat, PickerSelection,
};
