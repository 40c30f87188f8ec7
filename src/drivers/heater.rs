//! Resistive heater driver with hysteresis thermostat and safety watchdog.
//!
//! ## Thermostat
//!
//! | Sample              | Action                                   |
//! |---------------------|------------------------------------------|
//! | `t < low`           | start PWM, (re)arm watchdog → ON         |
//! | `t > high`          | stop PWM, cancel watchdog → OFF          |
//! | `low <= t <= high`  | no change                                |
//!
//! ## Watchdog
//!
//! Every qualifying low sample re-arms a one-shot timer.  If it expires
//! the heater is forced off regardless of temperature, so the feed must
//! arrive more often than the watchdog period to sustain heating.
//!
//! ## Manual override
//!
//! [`Actuator::set`] starts or stops the PWM directly.  It neither
//! consults the thresholds nor touches the watchdog.

use std::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::{Actuator, Scheduler, TimerHandle};
use crate::config::HeaterConfig;
use crate::error::Result;
use crate::events::{ActuatorId, TimerEvent, TimerKind};

use super::gpio_line::GpioLine;
use super::pin_backend::PinBackend;
use super::pwm::PwmEmulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterState {
    Off,
    On,
}

pub struct Heater {
    id: ActuatorId,
    pwm: PwmEmulator,
    line: GpioLine,
    low_c: i32,
    high_c: i32,
    watchdog_timeout: Duration,
    watchdog: Option<TimerHandle>,
}

impl Heater {
    pub fn new(id: ActuatorId, config: &HeaterConfig, backend: Box<dyn PinBackend>) -> Self {
        Self {
            id,
            pwm: PwmEmulator::new(id, config.pwm.period(), config.pwm.duty),
            line: GpioLine::new(config.pin.clone(), backend),
            low_c: config.low_c,
            high_c: config.high_c,
            watchdog_timeout: config.watchdog(),
            watchdog: None,
        }
    }

    pub fn state(&self) -> HeaterState {
        if self.pwm.is_running() {
            HeaterState::On
        } else {
            HeaterState::Off
        }
    }

    pub fn watchdog_armed(&self) -> bool {
        self.watchdog.is_some()
    }

    pub fn pwm(&self) -> &PwmEmulator {
        &self.pwm
    }

    /// Feed one temperature sample (°C) into the thermostat.
    pub fn temperature_changed(&mut self, celsius: i32, timers: &mut dyn Scheduler) -> Result<()> {
        if celsius < self.low_c {
            info!(
                "{}: low setpoint ({}) reached ({}).",
                self.line.name(),
                self.low_c,
                celsius
            );
            self.start(timers)
        } else if celsius > self.high_c {
            info!(
                "{}: high setpoint ({}) reached ({}).",
                self.line.name(),
                self.high_c,
                celsius
            );
            self.stop(timers)
        } else {
            debug!("{}: {} within band, no change", self.line.name(), celsius);
            Ok(())
        }
    }

    /// Arm the watchdog before touching the pin: if the write faults, the
    /// watchdog still forces the line off later.
    fn start(&mut self, timers: &mut dyn Scheduler) -> Result<()> {
        self.arm_watchdog(timers)?;
        self.pwm.start(timers, &mut self.line)
    }

    fn stop(&mut self, timers: &mut dyn Scheduler) -> Result<()> {
        if let Some(handle) = self.watchdog.take() {
            timers.cancel(handle);
        }
        self.pwm.stop(timers, &mut self.line)
    }

    fn arm_watchdog(&mut self, timers: &mut dyn Scheduler) -> Result<()> {
        if let Some(handle) = self.watchdog.take() {
            timers.cancel(handle);
        }
        let handle = timers.schedule(
            self.watchdog_timeout,
            TimerEvent::new(self.id, TimerKind::Watchdog),
        )?;
        self.watchdog = Some(handle);
        Ok(())
    }

    fn watchdog_expired(&mut self, handle: TimerHandle, timers: &mut dyn Scheduler) -> Result<()> {
        if self.watchdog != Some(handle) {
            debug!("{}: ignoring stale watchdog {:?}", self.line.name(), handle);
            return Ok(());
        }
        self.watchdog = None;
        warn!(
            "{}: watchdog expired after {:?}, forcing off",
            self.line.name(),
            self.watchdog_timeout
        );
        self.pwm.stop(timers, &mut self.line)
    }
}

impl Actuator for Heater {
    fn initialize(&mut self) -> Result<()> {
        self.line.initialize()
    }

    fn set(&mut self, on: bool, timers: &mut dyn Scheduler) -> Result<()> {
        info!("{}: manual {}", self.line.name(), if on { "on" } else { "off" });
        if on {
            self.pwm.start(timers, &mut self.line)
        } else {
            self.pwm.stop(timers, &mut self.line)
        }
    }

    fn on_timer(
        &mut self,
        handle: TimerHandle,
        kind: TimerKind,
        timers: &mut dyn Scheduler,
    ) -> Result<()> {
        match kind {
            TimerKind::PwmCycle => self.pwm.cycle(handle, timers, &mut self.line),
            TimerKind::Watchdog => self.watchdog_expired(handle, timers),
            TimerKind::Shutoff => {
                debug!("{}: ignoring shutoff timer", self.line.name());
                Ok(())
            }
        }
    }

    fn is_active(&self) -> bool {
        self.state() == HeaterState::On
    }

    fn line_mut(&mut self) -> &mut GpioLine {
        &mut self.line
    }
}
