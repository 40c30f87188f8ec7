//! Burnwire driver.
//!
//! The burnwire severs a mechanical restraint by melting through it.  It
//! is driven at full power (no PWM) and always self-limits: energising
//! schedules an automatic shutoff one pulse length later.
//!
//! ## Shutoff policy
//!
//! - `set(true)` cancels any shutoff still pending and schedules a fresh
//!   one, so an off→on sequence can never be cut short by the shutoff
//!   belonging to the earlier pulse.
//! - `set(false)` de-energises immediately but leaves a pending shutoff
//!   in place; when it fires it drives an already-off line off again.

use std::time::Duration;

use log::{debug, info};

use crate::app::ports::{Actuator, Scheduler, TimerHandle};
use crate::config::BurnwireConfig;
use crate::error::Result;
use crate::events::{ActuatorId, TimerEvent, TimerKind};

use super::gpio_line::GpioLine;
use super::pin_backend::PinBackend;

pub struct Burnwire {
    line: GpioLine,
    pulse: Duration,
    shutoff: Option<TimerHandle>,
    energised: bool,
}

impl Burnwire {
    pub fn new(config: &BurnwireConfig, backend: Box<dyn PinBackend>) -> Self {
        Self {
            line: GpioLine::new(config.pin.clone(), backend),
            pulse: config.pulse(),
            shutoff: None,
            energised: false,
        }
    }

    pub fn shutoff_pending(&self) -> bool {
        self.shutoff.is_some()
    }

    pub fn pulse(&self) -> Duration {
        self.pulse
    }

    /// The shutoff is scheduled before the write so that a faulted write
    /// still gets an attempt to de-energise later.
    fn energise(&mut self, timers: &mut dyn Scheduler) -> Result<()> {
        if let Some(stale) = self.shutoff.take() {
            timers.cancel(stale);
        }
        self.shutoff = Some(timers.schedule(
            self.pulse,
            TimerEvent::new(ActuatorId::Burnwire, TimerKind::Shutoff),
        )?);
        info!("{}: energised, shutoff in {:?}", self.line.name(), self.pulse);
        self.line.set_logical_value(true)?;
        self.energised = true;
        Ok(())
    }

    fn de_energise(&mut self) -> Result<()> {
        info!("{}: off", self.line.name());
        self.line.set_logical_value(false)?;
        self.energised = false;
        Ok(())
    }
}

impl Actuator for Burnwire {
    fn initialize(&mut self) -> Result<()> {
        self.line.initialize()
    }

    fn set(&mut self, on: bool, timers: &mut dyn Scheduler) -> Result<()> {
        if on {
            self.energise(timers)
        } else {
            self.de_energise()
        }
    }

    fn on_timer(
        &mut self,
        handle: TimerHandle,
        kind: TimerKind,
        _timers: &mut dyn Scheduler,
    ) -> Result<()> {
        if kind != TimerKind::Shutoff || self.shutoff != Some(handle) {
            debug!("{}: ignoring {:?} timer {:?}", self.line.name(), kind, handle);
            return Ok(());
        }
        self.shutoff = None;
        info!("{}: automatic shutoff", self.line.name());
        self.de_energise()
    }

    fn is_active(&self) -> bool {
        self.energised
    }

    fn line_mut(&mut self) -> &mut GpioLine {
        &mut self.line
    }
}
