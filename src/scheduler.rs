//! Timer queue for the single cooperative event loop.
//!
//! Every timer in the system (PWM phase transitions, heater watchdogs,
//! the burnwire shutoff) lives here.  The queue knows nothing about
//! actuators: it stores `(deadline, TimerEvent)` pairs and hands back
//! whichever is due.  The [`HardwareContext`] routes the event to its
//! owner.
//!
//! Time is a [`Duration`] since the loop started.  The real-time loop
//! feeds it from a monotonic clock; tests feed it directly, so timer
//! behaviour is checked in virtual time without sleeping.
//!
//! [`HardwareContext`]: crate::adapters::hardware::HardwareContext

use std::time::Duration;

use log::debug;

use crate::app::ports::{Scheduler, TimerHandle};
use crate::error::{Error, Result};
use crate::events::TimerEvent;

/// Maximum number of concurrently pending timers (stack-allocated).
///
/// Steady state needs at most seven: four PWM cycles, two watchdogs,
/// and one burnwire shutoff.
pub const TIMER_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
    event: TimerEvent,
}

/// Fixed-capacity store of pending timers.
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: heapless::Vec<PendingTimer, TIMER_CAPACITY>,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: heapless::Vec::new(),
        }
    }

    /// Current loop time.  New timers are scheduled relative to this.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move loop time forward.  Never moves backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// Loop time advances to `now`, so anything the fired timer schedules
    /// is measured from when it actually ran.  A late loop delays pending
    /// phases instead of replaying the ones it missed.
    /// Timers with equal deadlines fire in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, TimerEvent)> {
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.handle.0))?;

        let timer = self.pending.swap_remove(idx);
        self.set_now(now);
        Some((timer.handle, timer.event))
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Deadline of a pending timer.
    pub fn deadline(&self, handle: TimerHandle) -> Option<Duration> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, after: Duration, event: TimerEvent) -> Result<TimerHandle> {
        let handle = TimerHandle(self.next_id);
        let deadline = self.now + after;
        self.pending
            .push(PendingTimer {
                handle,
                deadline,
                event,
            })
            .map_err(|_| Error::TimerQueueFull {
                capacity: TIMER_CAPACITY,
            })?;
        self.next_id += 1;
        debug!(
            "Timers: {:?} for {} due at {:?}",
            event.kind, event.target, deadline
        );
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|t| t.handle == handle) {
            Some(idx) => {
                self.pending.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
