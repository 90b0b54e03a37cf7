//! Countdown to the next scheduled lookup.
//!
//! Derived purely from the cycle start and the interval length; the UI asks
//! for the values on every frame, so nothing here needs a timer of its own.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub start: Instant,
    pub total: Duration,
}

impl Countdown {
    pub fn new(start: Instant, total: Duration) -> Self {
        Self { start, total }
    }

    fn elapsed_ms(&self, now: Instant) -> u128 {
        now.saturating_duration_since(self.start).as_millis()
    }

    /// Whole seconds until the next lookup, rounded up.
    pub fn seconds_left(&self, now: Instant) -> i64 {
        let left = self.total.as_millis().saturating_sub(self.elapsed_ms(now));
        left.div_ceil(1000) as i64
    }

    /// Elapsed share of the interval, rounded up, in `0..=100`.
    pub fn percentage(&self, now: Instant) -> u16 {
        let total = self.total.as_millis();
        if total == 0 {
            return 100;
        }
        let done = self.elapsed_ms(now).min(total);
        (100 * done).div_ceil(total) as u16
    }
}
