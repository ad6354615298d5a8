//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Countdown state
//! - Picker input (minutes and seconds) with validation
//! - View configuration
//! - Events emitted by the view in JSON mode

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::countdown::CountdownError;

// ============================================================================
// CountdownState
// ============================================================================

/// Represents the current state of a countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownState {
    /// Not running; the configured duration is shown
    #[default]
    Reset,
    /// Counting down
    Started,
    /// Reached zero; stays here until reset
    Finished,
}

impl CountdownState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownState::Reset => "reset",
            CountdownState::Started => "started",
            CountdownState::Finished => "finished",
        }
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PickerSelection
// ============================================================================

/// Highest selectable minute value.
pub const MAX_MINUTES: u32 = 60;

/// Highest selectable second value.
pub const MAX_SECONDS: u32 = 59;

/// A minutes/seconds pair as chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerSelection {
    /// Minutes (0-60)
    pub minutes: u32,
    /// Seconds (0-59)
    pub seconds: u32,
}

impl PickerSelection {
    /// Creates a validated selection.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is outside the picker range.
    pub fn new(minutes: u32, seconds: u32) -> Result<Self, CountdownError> {
        let selection = Self { minutes, seconds };
        selection.validate()?;
        Ok(selection)
    }

    /// Checks both components against the picker range.
    pub fn validate(&self) -> Result<(), CountdownError> {
        if self.minutes > MAX_MINUTES {
            return Err(CountdownError::MinutesOutOfRange(self.minutes));
        }
        if self.seconds > MAX_SECONDS {
            return Err(CountdownError::SecondsOutOfRange(self.seconds));
        }
        Ok(())
    }

    /// Total number of seconds selected.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Converts the selection to a countdown duration.
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds())
    }
}

// ============================================================================
// CountdownConfig
// ============================================================================

/// Default tick cadence in milliseconds (one hundredth of a second).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

/// Slowest tick cadence that still updates the display smoothly.
pub const MAX_TICK_INTERVAL_MS: u64 = 100;

/// How the view renders countdown output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// A single line updated in place
    #[default]
    Text,
    /// One JSON event per line
    Json,
}

/// Configuration for a countdown view session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Initial minutes/seconds selection
    pub selection: PickerSelection,
    /// Tick cadence in milliseconds (1-100)
    pub tick_interval_ms: u64,
    /// Whether to start counting as soon as the view opens
    pub auto_start: bool,
    /// Output rendering
    pub output: OutputFormat,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            selection: PickerSelection::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            auto_start: true,
            output: OutputFormat::Text,
        }
    }
}

impl CountdownConfig {
    /// Creates a new configuration with the specified selection.
    pub fn with_selection(mut self, selection: PickerSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Creates a new configuration with the specified tick cadence.
    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), CountdownError> {
        self.selection.validate()?;
        if self.tick_interval_ms == 0 || self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(CountdownError::InvalidTickInterval(self.tick_interval_ms));
        }
        Ok(())
    }

    /// Tick cadence as a duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// ============================================================================
// CountdownEvent
// ============================================================================

/// Events rendered by the view in JSON mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CountdownEvent {
    /// A countdown run began
    Started {
        /// Length of the run
        duration_ms: u64,
    },
    /// The remaining time changed
    Update {
        /// Time left
        remaining_ms: u64,
        /// Time left as `HH:mm:ss:SS`
        display: String,
    },
    /// A new duration was configured while reset
    DurationSet {
        /// New duration
        duration_ms: u64,
    },
    /// The countdown reached zero
    Finished,
    /// The countdown returned to its configured duration
    Reset {
        /// Restored duration
        duration_ms: u64,
    },
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================
