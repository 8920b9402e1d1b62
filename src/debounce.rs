//! Trailing-edge debounce over an injected clock.
//!
//! Every [`Debounce::input`] replaces the pending value and restarts the
//! delay; [`Debounce::fire`] hands the value out once the delay has elapsed
//! without further input. Callers pass the current instant in, so the
//! debouncer never reads a clock itself.

use core::time::Duration;

use tokio::time::Instant;

/// Delay applied to search input before it becomes a query.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// A pending value waiting for input to pause.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    /// Quiet period required before a value is released.
    delay: Duration,
    /// Latest value and the instant it becomes due.
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    /// Creates an idle debouncer with the given quiet period.
    #[inline]
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Returns the configured quiet period.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a new value, cancelling and restarting any pending timer.
    #[inline]
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Returns when the pending value becomes due, if any.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.1)
    }

    /// Returns `true` while a value is waiting.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending value if its deadline has passed.
    #[inline]
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((value, due)) if due <= now => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drops the pending value without releasing it.
    #[inline]
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debounce<T> {
    #[inline]
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
