//! Monotonic clock for the real-time event loop.
//!
//! The timer queue works in elapsed time since startup.  This adapter
//! measures that axis with `std::time::Instant`; tests skip it and drive
//! the queue with explicit durations instead.

use std::time::{Duration, Instant};

pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// How long from now until `deadline`, zero if already past.
    pub fn until(&self, deadline: Duration) -> Duration {
        deadline.saturating_sub(self.elapsed())
    }
}
