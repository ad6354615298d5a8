//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::{
    CountdownConfig, OutputFormat, PickerSelection, DEFAULT_TICK_INTERVAL_MS,
    MAX_TICK_INTERVAL_MS,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown - a single-screen countdown timer
#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    version,
    about = "A single-screen countdown timer for the terminal",
    long_about = "Pick minutes and seconds, start the countdown, and get an alert when it \
                  reaches zero.\nWhile running, type `start`, `reset`, `set <min> <sec>` \
                  or `quit` followed by Enter.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the countdown screen
    Start(StartArgs),

    /// Print a number of seconds as HH:mm:ss:SS
    Format {
        /// Time span in seconds (fractions allowed)
        #[arg(value_parser = parse_seconds)]
        seconds: f64,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Start Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Minutes (0-60)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..=60)
    )]
    pub minutes: u32,

    /// Seconds (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..=59)
    )]
    pub seconds: u32,

    /// Tick interval in milliseconds (1-100)
    #[arg(
        long,
        default_value_t = DEFAULT_TICK_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TICK_INTERVAL_MS)
    )]
    pub tick_ms: u64,

    /// Emit one JSON event per line instead of the live display
    #[arg(long)]
    pub json: bool,

    /// Open the screen without starting the countdown
    #[arg(long)]
    pub paused: bool,
}

impl Default for StartArgs {
    fn default() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            tick_ms: DEFAULT_TICK_INTERVAL_MS,
            json: false,
            paused: false,
        }
    }
}

impl StartArgs {
    /// Builds the view configuration from the parsed arguments.
    pub fn to_config(&self) -> CountdownConfig {
        CountdownConfig {
            selection: PickerSelection {
                minutes: self.minutes,
                seconds: self.seconds,
            },
            tick_interval_ms: self.tick_ms,
            auto_start: !self.paused,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a non-negative, finite number of seconds.
fn parse_seconds(s: &str) -> Result<f64, String> {
    let seconds: f64 = s
        .parse()
        .map_err(|_| format!("`{}` is not a number", s))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err("seconds must be a non-negative number".to_string());
    }
    Ok(seconds)
}

// ============================================================================
// Tests
// ============================================================================
