//! Observer interface for countdown notifications.

use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Listener notified while a countdown runs.
///
/// Notifications are one-way pushes on the thread that drives the
/// countdown. The countdown holds only a weak reference, so the listener's
/// owner decides how long it lives.
pub trait CountdownObserver {
    /// Called on every tick that leaves time on the clock.
    fn countdown_did_update(&self, time_remaining: Duration);

    /// Called once when the countdown reaches zero.
    fn countdown_did_finish(&self);
}

/// Mock observer for testing.
#[derive(Debug, Default)]
pub struct MockCountdownObserver {
    updates: RefCell<Vec<Duration>>,
    finish_count: Cell<usize>,
}

impl MockCountdownObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining times reported so far, oldest first.
    #[must_use]
    pub fn updates(&self) -> Vec<Duration> {
        self.updates.borrow().clone()
    }

    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates.borrow().len()
    }

    #[must_use]
    pub fn finish_count(&self) -> usize {
        self.finish_count.get()
    }
}

impl CountdownObserver for MockCountdownObserver {
    fn countdown_did_update(&self, time_remaining: Duration) {
        self.updates.borrow_mut().push(time_remaining);
    }

    fn countdown_did_finish(&self) {
        self.finish_count.set(self.finish_count.get() + 1);
    }
}
