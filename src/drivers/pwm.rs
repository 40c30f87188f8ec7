//! Software PWM emulator.
//!
//! Approximates a power-limited analog signal on a plain digital line by
//! toggling it from cooperative timers:
//!
//! ```text
//!          ┌─────┐               ┌─────┐
//!   on     │     │               │     │
//!   off ───┘     └───────────────┘     └──────
//!          │◀P·d▶│◀── P·(1-d) ──▶│
//!        start                  cycle
//! ```
//!
//! The emulator owns at most one pending timer.  Phase changes are
//! delivered to a single `embedded-hal` [`OutputPin`] supplied by the
//! owning controller on each call.

use std::time::Duration;

use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::app::ports::{Scheduler, TimerHandle};
use crate::error::{Error, Result};
use crate::events::{ActuatorId, TimerEvent, TimerKind};

/// Shortest accepted period; a zero period would spin the loop.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Current output phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    On,
    Off,
}

pub struct PwmEmulator {
    owner: ActuatorId,
    period: Duration,
    duty: f64,
    phase: Phase,
    pending: Option<TimerHandle>,
}

impl PwmEmulator {
    pub fn new(owner: ActuatorId, period: Duration, duty: f64) -> Self {
        if period < MIN_PERIOD {
            warn!("PWM {owner}: period {period:?} raised to {MIN_PERIOD:?}");
        }
        Self {
            owner,
            period: period.max(MIN_PERIOD),
            duty: clamp_duty(owner, duty),
            phase: Phase::Off,
            pending: None,
        }
    }

    pub fn duty(&self) -> f64 {
        self.duty
    }

    /// Whether the cycle timer is armed.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes effect from the next phase transition.
    pub fn set_duty(&mut self, duty: f64) {
        self.duty = clamp_duty(self.owner, duty);
    }

    /// Length of the phase being entered, rounded to the nanosecond.
    pub fn interval(&self, phase: Phase) -> Duration {
        let fraction = match phase {
            Phase::On => self.duty,
            Phase::Off => 1.0 - self.duty,
        };
        Duration::from_nanos((self.period.as_nanos() as f64 * fraction).round() as u64)
    }

    /// Arm the cycle timer and drive the pin on.  No-op if running.
    ///
    /// If either step fails the emulator stays stopped and the pin is not
    /// left on.
    pub fn start<P>(&mut self, timers: &mut dyn Scheduler, pin: &mut P) -> Result<()>
    where
        P: OutputPin,
        Error: From<P::Error>,
    {
        if self.is_running() {
            return Ok(());
        }
        debug!("PWM {}: start ({:?}, duty {})", self.owner, self.period, self.duty);
        self.phase = Phase::On;
        if let Err(e) = self.arm(timers) {
            self.phase = Phase::Off;
            return Err(e);
        }
        if let Err(e) = pin.set_high() {
            if let Some(handle) = self.pending.take() {
                timers.cancel(handle);
            }
            self.phase = Phase::Off;
            return Err(e.into());
        }
        Ok(())
    }

    /// Cancel the cycle timer and drive the pin off, whatever the phase.
    pub fn stop<P>(&mut self, timers: &mut dyn Scheduler, pin: &mut P) -> Result<()>
    where
        P: OutputPin,
        Error: From<P::Error>,
    {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
            debug!("PWM {}: stop", self.owner);
        }
        self.phase = Phase::Off;
        pin.set_low()?;
        Ok(())
    }

    /// Cycle timer expiry: toggle the phase and re-arm.
    ///
    /// Stale handles (from a timer that was cancelled while already
    /// dequeued) are ignored.  The timer is re-armed before the pin is
    /// written, so a failing write does not stop the cycle.
    pub fn cycle<P>(
        &mut self,
        handle: TimerHandle,
        timers: &mut dyn Scheduler,
        pin: &mut P,
    ) -> Result<()>
    where
        P: OutputPin,
        Error: From<P::Error>,
    {
        if self.pending != Some(handle) {
            debug!("PWM {}: ignoring stale cycle {:?}", self.owner, handle);
            return Ok(());
        }
        self.pending = None;

        self.phase = match self.phase {
            Phase::On => Phase::Off,
            Phase::Off => Phase::On,
        };
        self.arm(timers)?;

        match self.phase {
            Phase::On => pin.set_high()?,
            Phase::Off => pin.set_low()?,
        }
        Ok(())
    }

    fn arm(&mut self, timers: &mut dyn Scheduler) -> Result<()> {
        let handle = timers.schedule(
            self.interval(self.phase),
            TimerEvent::new(self.owner, TimerKind::PwmCycle),
        )?;
        self.pending = Some(handle);
        Ok(())
    }
}

fn clamp_duty(owner: ActuatorId, duty: f64) -> f64 {
    if duty.is_nan() {
        warn!("PWM {owner}: NaN duty replaced with 0");
        return 0.0;
    }
    if !(0.0..=1.0).contains(&duty) {
        warn!("PWM {owner}: duty {duty} clamped to 0.0-1.0");
    }
    duty.clamp(0.0, 1.0)
}
