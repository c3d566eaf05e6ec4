//! Monotonic wall clock
//!
//! `Utc::now()` can step backwards (NTP adjustments, VM migration). Stores
//! that promise non-decreasing creation timestamps draw them from a
//! [`MonotonicClock`] instead.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

/// Hands out UTC timestamps that never decrease for the lifetime of the clock.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, or the previously returned time if the system clock
    /// went backwards in between.
    pub fn now(&self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    fn observe(&self, wall: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(prev) if prev > wall => prev,
            _ => wall,
        };
        *last = Some(next);
        next
    }
}
