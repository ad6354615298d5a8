//! Countdown state machine.
//!
//! This module provides the core timer functionality:
//! - State transitions (Reset → Started → Finished → Reset)
//! - Time-remaining bookkeeping driven by measured elapsed time
//! - A single armed deadline that `tick()` waits on
//! - Observer notifications on each tick and on completion

use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use super::{CountdownError, CountdownObserver};
use crate::types::{CountdownConfig, CountdownState, DEFAULT_TICK_INTERVAL_MS};

// ============================================================================
// Countdown
// ============================================================================

/// A countdown timer.
///
/// `start()` and `reset()` only arm or disarm the repeating deadline; the
/// owner drives the countdown by awaiting [`Countdown::tick`] on its event
/// loop. Everything runs on one thread.
pub struct Countdown {
    /// Configured length of a run
    duration: Duration,
    /// Time left in the current run
    time_remaining: Duration,
    /// Current state
    state: CountdownState,
    /// Cadence of the repeating deadline
    tick_interval: Duration,
    /// Next tick deadline; `Some` only while started
    next_deadline: Option<Instant>,
    /// When the previous tick (or the start) happened
    last_tick: Option<Instant>,
    /// Listener, not owned
    observer: Option<Weak<dyn CountdownObserver>>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            duration: Duration::ZERO,
            time_remaining: Duration::ZERO,
            state: CountdownState::Reset,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            next_deadline: None,
            last_tick: None,
            observer: None,
        }
    }
}

impl Countdown {
    /// Creates a reset countdown with a zero duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reset countdown that ticks at the given cadence.
    ///
    /// Any non-zero interval is accepted here; the 1-100 ms display range is
    /// enforced by [`CountdownConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero.
    pub fn with_tick_interval(tick_interval: Duration) -> Result<Self, CountdownError> {
        if tick_interval.is_zero() {
            return Err(CountdownError::ZeroTickInterval);
        }
        Ok(Self {
            tick_interval,
            ..Self::default()
        })
    }

    /// Creates a reset countdown from a validated configuration.
    pub fn from_config(config: &CountdownConfig) -> Result<Self, CountdownError> {
        config.validate()?;
        let mut countdown = Self::with_tick_interval(config.tick_interval())?;
        countdown.set_duration(config.selection.to_duration())?;
        Ok(countdown)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Returns true while a deadline is armed.
    pub fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    /// Sets the length of the next run.
    ///
    /// # Errors
    ///
    /// Returns an error unless the countdown is reset.
    pub fn set_duration(&mut self, duration: Duration) -> Result<(), CountdownError> {
        if self.state != CountdownState::Reset {
            return Err(CountdownError::NotReset(self.state));
        }
        self.duration = duration;
        self.time_remaining = duration;
        Ok(())
    }

    /// Registers the listener for tick and finish notifications.
    ///
    /// Only a weak reference is kept; once the caller drops the last `Rc`,
    /// notifications are skipped.
    pub fn set_observer<O: CountdownObserver + 'static>(&mut self, observer: &Rc<O>) {
        let observer: Weak<O> = Rc::downgrade(observer);
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Starts a run of the configured duration.
    ///
    /// # Errors
    ///
    /// Returns an error, and changes nothing, if the duration is zero or the
    /// countdown is not reset.
    pub fn start(&mut self) -> Result<(), CountdownError> {
        if self.state != CountdownState::Reset {
            return Err(CountdownError::NotReset(self.state));
        }
        if self.duration.is_zero() {
            return Err(CountdownError::ZeroDuration);
        }

        let now = Instant::now();
        self.time_remaining = self.duration;
        self.state = CountdownState::Started;
        self.last_tick = Some(now);
        self.next_deadline = Some(now + self.tick_interval);

        debug!(duration = ?self.duration, "countdown started");
        Ok(())
    }

    /// Disarms any pending tick and restores the configured duration.
    pub fn reset(&mut self) {
        self.disarm();
        self.time_remaining = self.duration;
        if self.state != CountdownState::Reset {
            debug!(from = %self.state, "countdown reset");
        }
        self.state = CountdownState::Reset;
    }

    /// Waits for the armed deadline, then applies one tick.
    ///
    /// Never completes while nothing is armed. Cancel-safe: the countdown is
    /// only modified after the wait has finished.
    pub async fn tick(&mut self) {
        let Some(deadline) = self.next_deadline else {
            return std::future::pending().await;
        };
        sleep_until(deadline).await;

        let now = Instant::now();
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(self.tick_interval);
        self.last_tick = Some(now);

        // Missed deadlines are skipped rather than replayed in a burst.
        let mut next = deadline + self.tick_interval;
        if next <= now {
            next = now + self.tick_interval;
        }
        self.next_deadline = Some(next);

        self.advance(elapsed);
    }

    /// Applies one tick of `elapsed` time.
    ///
    /// Has no effect unless the countdown is started.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.state != CountdownState::Started {
            return;
        }

        self.time_remaining = self.time_remaining.saturating_sub(elapsed);
        trace!(remaining = ?self.time_remaining, "countdown tick");

        if self.time_remaining.is_zero() {
            self.finish();
        } else if let Some(observer) = self.observer() {
            observer.countdown_did_update(self.time_remaining);
        }
    }

    /// The value a display should show for the current state.
    pub fn displayed_time(&self) -> Duration {
        match self.state {
            CountdownState::Reset => self.duration,
            CountdownState::Started => self.time_remaining,
            CountdownState::Finished => Duration::ZERO,
        }
    }

    /// Returns true unless a run is in progress.
    pub fn can_start(&self) -> bool {
        self.state != CountdownState::Started
    }

    fn finish(&mut self) {
        self.disarm();
        self.state = CountdownState::Finished;
        debug!("countdown finished");

        if let Some(observer) = self.observer() {
            observer.countdown_did_finish();
        }
    }

    fn disarm(&mut self) {
        self.next_deadline = None;
        self.last_tick = None;
    }

    fn observer(&self) -> Option<Rc<dyn CountdownObserver>> {
        self.observer.as_ref().and_then(Weak::upgrade)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::MockCountdownObserver;
    use crate::types::PickerSelection;

    fn create_countdown(seconds: u64) -> (Countdown, Rc<MockCountdownObserver>) {
        let observer = Rc::new(MockCountdownObserver::new());
        let mut countdown = Countdown::with_tick_interval(Duration::from_secs(1)).unwrap();
        countdown.set_duration(Duration::from_secs(seconds)).unwrap();
        countdown.set_observer(&observer);
        (countdown, observer)
    }

    // ------------------------------------------------------------------------
    // Construction Tests
    // ------------------------------------------------------------------------

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_countdown() {
            let countdown = Countdown::new();
            assert_eq!(countdown.state(), CountdownState::Reset);
            assert_eq!(countdown.duration(), Duration::ZERO);
            assert_eq!(countdown.time_remaining(), Duration::ZERO);
            assert_eq!(countdown.tick_interval(), Duration::from_millis(10));
            assert!(!countdown.is_armed());
        }

        #[test]
        fn test_zero_tick_interval_rejected() {
            let result = Countdown::with_tick_interval(Duration::ZERO);
            assert!(matches!(result, Err(CountdownError::ZeroTickInterval)));
        }

        #[test]
        fn test_any_nonzero_tick_interval_accepted() {
            let slow = Countdown::with_tick_interval(Duration::from_secs(5)).unwrap();
            assert_eq!(slow.tick_interval(), Duration::from_secs(5));

            let fast = Countdown::with_tick_interval(Duration::from_micros(100)).unwrap();
            assert_eq!(fast.tick_interval(), Duration::from_micros(100));
        }

        #[test]
        fn test_config_bounds_tick_interval() {
            let config = CountdownConfig::default().with_tick_interval_ms(5000);
            assert!(matches!(
                Countdown::from_config(&config),
                Err(CountdownError::InvalidTickInterval(5000))
            ));
        }

        #[test]
        fn test_observer_registration_notifies() {
            let observer = Rc::new(MockCountdownObserver::new());
            let mut countdown = Countdown::new();
            countdown.set_duration(Duration::from_secs(2)).unwrap();
            countdown.set_observer(&observer);
            countdown.start().unwrap();

            countdown.advance(Duration::from_secs(1));

            assert_eq!(observer.updates(), vec![Duration::from_secs(1)]);
        }

        #[test]
        fn test_from_config() {
            let config = CountdownConfig::default()
                .with_selection(PickerSelection::new(1, 30).unwrap())
                .with_tick_interval_ms(50);
            let countdown = Countdown::from_config(&config).unwrap();

            assert_eq!(countdown.duration(), Duration::from_secs(90));
            assert_eq!(countdown.time_remaining(), Duration::from_secs(90));
            assert_eq!(countdown.tick_interval(), Duration::from_millis(50));
        }

        #[test]
        fn test_from_invalid_config() {
            let config = CountdownConfig::default().with_tick_interval_ms(500);
            assert!(Countdown::from_config(&config).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    mod transition_tests {
        use super::*;

        #[test]
        fn test_start() {
            let (mut countdown, observer) = create_countdown(5);

            countdown.start().unwrap();

            assert_eq!(countdown.state(), CountdownState::Started);
            assert_eq!(countdown.time_remaining(), Duration::from_secs(5));
            assert!(countdown.is_armed());
            assert!(!countdown.can_start());
            assert_eq!(observer.update_count(), 0);
        }

        #[test]
        fn test_start_zero_duration_is_noop() {
            let (mut countdown, _observer) = create_countdown(0);

            let result = countdown.start();

            assert_eq!(result, Err(CountdownError::ZeroDuration));
            assert_eq!(countdown.state(), CountdownState::Reset);
            assert!(!countdown.is_armed());
        }

        #[test]
        fn test_start_while_started_is_noop() {
            let (mut countdown, _observer) = create_countdown(5);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(2));

            let result = countdown.start();

            assert_eq!(
                result,
                Err(CountdownError::NotReset(CountdownState::Started))
            );
            assert_eq!(countdown.time_remaining(), Duration::from_secs(3));
        }

        #[test]
        fn test_start_while_finished_is_noop() {
            let (mut countdown, _observer) = create_countdown(1);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(1));

            let result = countdown.start();

            assert_eq!(
                result,
                Err(CountdownError::NotReset(CountdownState::Finished))
            );
            assert_eq!(countdown.state(), CountdownState::Finished);
        }

        #[test]
        fn test_advance_notifies_update() {
            let (mut countdown, observer) = create_countdown(5);
            countdown.start().unwrap();

            countdown.advance(Duration::from_secs(1));
            countdown.advance(Duration::from_millis(500));

            assert_eq!(
                observer.updates(),
                vec![Duration::from_secs(4), Duration::from_millis(3500)]
            );
            assert_eq!(observer.finish_count(), 0);
        }

        #[test]
        fn test_five_one_second_ticks_finish() {
            let (mut countdown, observer) = create_countdown(5);
            countdown.start().unwrap();

            for _ in 0..5 {
                countdown.advance(Duration::from_secs(1));
            }

            assert_eq!(countdown.state(), CountdownState::Finished);
            assert_eq!(countdown.time_remaining(), Duration::ZERO);
            assert_eq!(observer.finish_count(), 1);
            assert_eq!(observer.update_count(), 4);
            assert!(!countdown.is_armed());

            countdown.reset();

            assert_eq!(countdown.state(), CountdownState::Reset);
            assert_eq!(countdown.time_remaining(), Duration::from_secs(5));
        }

        #[test]
        fn test_overshoot_clamps_to_zero() {
            let (mut countdown, observer) = create_countdown(2);
            countdown.start().unwrap();

            countdown.advance(Duration::from_secs(10));

            assert_eq!(countdown.time_remaining(), Duration::ZERO);
            assert_eq!(countdown.state(), CountdownState::Finished);
            assert_eq!(observer.finish_count(), 1);
        }

        #[test]
        fn test_advance_after_finish_is_ignored() {
            let (mut countdown, observer) = create_countdown(1);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(1));

            countdown.advance(Duration::from_secs(1));

            assert_eq!(observer.finish_count(), 1);
            assert_eq!(observer.update_count(), 0);
        }

        #[test]
        fn test_advance_while_reset_is_ignored() {
            let (mut countdown, observer) = create_countdown(5);

            countdown.advance(Duration::from_secs(1));

            assert_eq!(countdown.time_remaining(), Duration::from_secs(5));
            assert_eq!(observer.update_count(), 0);
        }

        #[test]
        fn test_reset_from_started() {
            let (mut countdown, observer) = create_countdown(5);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(2));

            countdown.reset();

            assert_eq!(countdown.state(), CountdownState::Reset);
            assert_eq!(countdown.time_remaining(), Duration::from_secs(5));
            assert!(!countdown.is_armed());

            countdown.advance(Duration::from_secs(1));
            assert_eq!(observer.update_count(), 1);
        }

        #[test]
        fn test_reset_twice_equals_once() {
            let (mut countdown, _observer) = create_countdown(5);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(1));

            countdown.reset();
            let state = countdown.state();
            let remaining = countdown.time_remaining();
            countdown.reset();

            assert_eq!(countdown.state(), state);
            assert_eq!(countdown.time_remaining(), remaining);
            assert!(!countdown.is_armed());
        }

        #[test]
        fn test_restart_after_reset() {
            let (mut countdown, observer) = create_countdown(2);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(2));
            countdown.reset();

            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(2));

            assert_eq!(countdown.state(), CountdownState::Finished);
            assert_eq!(observer.finish_count(), 2);
        }
    }

    // ------------------------------------------------------------------------
    // Duration and Display Tests
    // ------------------------------------------------------------------------

    mod duration_tests {
        use super::*;

        #[test]
        fn test_set_duration_while_reset() {
            let (mut countdown, _observer) = create_countdown(5);

            countdown.set_duration(Duration::from_secs(30)).unwrap();

            assert_eq!(countdown.duration(), Duration::from_secs(30));
            assert_eq!(countdown.time_remaining(), Duration::from_secs(30));
        }

        #[test]
        fn test_set_duration_while_started_rejected() {
            let (mut countdown, _observer) = create_countdown(5);
            countdown.start().unwrap();

            let result = countdown.set_duration(Duration::from_secs(30));

            assert_eq!(
                result,
                Err(CountdownError::NotReset(CountdownState::Started))
            );
            assert_eq!(countdown.duration(), Duration::from_secs(5));
        }

        #[test]
        fn test_set_duration_while_finished_rejected() {
            let (mut countdown, _observer) = create_countdown(1);
            countdown.start().unwrap();
            countdown.advance(Duration::from_secs(1));

            assert!(countdown.set_duration(Duration::from_secs(30)).is_err());
            assert_eq!(countdown.duration(), Duration::from_secs(1));
        }

        #[test]
        fn test_displayed_time_per_state() {
            let (mut countdown, _observer) = create_countdown(5);
            assert_eq!(countdown.displayed_time(), Duration::from_secs(5));

            countdown.start().unwrap();
            countdown.advance(Duration::from_millis(1250));
            assert_eq!(countdown.displayed_time(), Duration::from_millis(3750));

            countdown.advance(Duration::from_secs(4));
            assert_eq!(countdown.displayed_time(), Duration::ZERO);
            assert!(countdown.can_start());
        }
    }

    // ------------------------------------------------------------------------
    // Observer Tests
    // ------------------------------------------------------------------------

    mod observer_tests {
        use super::*;

        #[test]
        fn test_without_observer() {
            let mut countdown = Countdown::new();
            countdown.set_duration(Duration::from_secs(1)).unwrap();
            countdown.start().unwrap();

            countdown.advance(Duration::from_secs(1));

            assert_eq!(countdown.state(), CountdownState::Finished);
        }

        #[test]
        fn test_dropped_observer_is_skipped() {
            let (mut countdown, observer) = create_countdown(2);
            countdown.start().unwrap();
            drop(observer);

            countdown.advance(Duration::from_secs(1));
            countdown.advance(Duration::from_secs(1));

            assert_eq!(countdown.state(), CountdownState::Finished);
        }

        #[test]
        fn test_clear_observer() {
            let (mut countdown, observer) = create_countdown(2);
            countdown.clear_observer();
            countdown.start().unwrap();

            countdown.advance(Duration::from_secs(1));

            assert_eq!(observer.update_count(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // Integration Tests with Tokio Runtime
    // ------------------------------------------------------------------------

    mod integration_tests {
        use super::*;
        use tokio::time::timeout;

        #[tokio::test(start_paused = true)]
        async fn test_tick_counts_down_to_finish() {
            let (mut countdown, observer) = create_countdown(5);
            countdown.start().unwrap();

            for _ in 0..5 {
                countdown.tick().await;
            }

            assert_eq!(countdown.state(), CountdownState::Finished);
            assert_eq!(countdown.time_remaining(), Duration::ZERO);
            assert_eq!(observer.finish_count(), 1);
            assert_eq!(
                observer.updates(),
                vec![
                    Duration::from_secs(4),
                    Duration::from_secs(3),
                    Duration::from_secs(2),
                    Duration::from_secs(1),
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_tick_never_completes_when_disarmed() {
            let (mut countdown, observer) = create_countdown(5);

            let result = timeout(Duration::from_secs(10), countdown.tick()).await;

            assert!(result.is_err());
            assert_eq!(observer.update_count(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_reset_cancels_pending_ticks() {
            let (mut countdown, observer) = create_countdown(5);
            countdown.start().unwrap();
            countdown.tick().await;

            countdown.reset();
            let result = timeout(Duration::from_secs(10), countdown.tick()).await;

            assert!(result.is_err());
            assert_eq!(observer.update_count(), 1);
            assert_eq!(observer.finish_count(), 0);
            assert_eq!(countdown.time_remaining(), Duration::from_secs(5));
        }

        #[tokio::test(start_paused = true)]
        async fn test_tick_measures_elapsed_time() {
            let (mut countdown, observer) = create_countdown(10);
            countdown.start().unwrap();

            // Fall behind by more than one interval; the next tick catches up.
            tokio::time::advance(Duration::from_millis(2500)).await;
            countdown.tick().await;

            assert_eq!(observer.updates(), vec![Duration::from_millis(7500)]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancelled_tick_leaves_state_untouched() {
            let (mut countdown, observer) = create_countdown(5);
            countdown.start().unwrap();

            let result = timeout(Duration::from_millis(500), countdown.tick()).await;

            assert!(result.is_err());
            assert_eq!(countdown.time_remaining(), Duration::from_secs(5));
            assert_eq!(observer.update_count(), 0);

            countdown.tick().await;
            assert_eq!(countdown.time_remaining(), Duration::from_secs(4));
        }
    }
}
