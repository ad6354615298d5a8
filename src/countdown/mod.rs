//! Countdown core.
//!
//! This module contains the timer state machine:
//! - `timer`: `Countdown` with start/reset/finish transitions and ticking
//! - `observer`: listener trait for tick and finish notifications
//! - `error`: refusals and configuration errors

mod error;
mod observer;
pub mod timer;

pub use error::CountdownError;
pub use observer::{CountdownObserver, MockCountdownObserver};
pub use timer::Countdown;
