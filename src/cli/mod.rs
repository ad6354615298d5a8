//! CLI module for the countdown timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Time formatting and message output
//! - `view`: The terminal countdown screen

pub mod commands;
pub mod display;
pub mod view;

pub use commands::{Cli, Commands, StartArgs};
pub use display::{format_time_span, Display};
pub use view::{CountdownView, TerminalRenderer, ViewCommand, ViewFlow};
