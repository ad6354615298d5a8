//! Display utilities for the countdown CLI.
//!
//! This module provides:
//! - `HH:mm:ss:SS` time formatting
//! - The completion alert text
//! - Error and hint messages

use std::time::Duration;

/// Title of the completion alert.
pub const ALERT_TITLE: &str = "Timer Finished";

/// Body of the completion alert.
pub const ALERT_MESSAGE: &str = "Your countdown is over";

/// Formats a time span as `HH:mm:ss:SS` (hours, minutes, seconds, hundredths).
///
/// Hundredths are truncated. Hours do not wrap at 24.
pub fn format_time_span(span: Duration) -> String {
    let total_seconds = span.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    let hundredths = span.subsec_millis() / 10;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, hundredths)
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a formatted time span on its own line.
    pub fn show_time_span(span: Duration) {
        println!("{}", format_time_span(span));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Lists the commands accepted while the screen is open.
    pub fn command_help() -> &'static str {
        "commands: start (s), reset (r), set <minutes> <seconds>, quit (q)"
    }
}

// ============================================================================
// Tests
// ============================================================================
