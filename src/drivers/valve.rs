//! Solenoid valve driver.
//!
//! A valve is held open by brief energise pulses rather than continuous
//! power: "open" means the PWM emulator is running, "closed" means it is
//! stopped and the coil is de-energised.  Purely command-driven; there is
//! no pressure feedback.
//!
//! GPIO faults propagate out of [`Actuator::set`] unmodified.

use log::{debug, info};

use crate::app::ports::{Actuator, Scheduler, TimerHandle};
use crate::config::ValveConfig;
use crate::error::Result;
use crate::events::{ActuatorId, TimerKind};

use super::gpio_line::GpioLine;
use super::pin_backend::PinBackend;
use super::pwm::PwmEmulator;

pub struct Valve {
    pwm: PwmEmulator,
    line: GpioLine,
}

impl Valve {
    pub fn new(id: ActuatorId, config: &ValveConfig, backend: Box<dyn PinBackend>) -> Self {
        Self {
            pwm: PwmEmulator::new(id, config.pwm.period(), config.pwm.duty),
            line: GpioLine::new(config.pin.clone(), backend),
        }
    }

    pub fn is_open(&self) -> bool {
        self.pwm.is_running()
    }

    pub fn pwm(&self) -> &PwmEmulator {
        &self.pwm
    }
}

impl Actuator for Valve {
    fn initialize(&mut self) -> Result<()> {
        self.line.initialize()
    }

    fn set(&mut self, on: bool, timers: &mut dyn Scheduler) -> Result<()> {
        if on {
            info!("{}: open", self.line.name());
            self.pwm.start(timers, &mut self.line)
        } else {
            info!("{}: close", self.line.name());
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
            other => {
                debug!("{}: ignoring {:?} timer", self.line.name(), other);
                Ok(())
            }
        }
    }

    fn is_active(&self) -> bool {
        self.is_open()
    }

    fn line_mut(&mut self) -> &mut GpioLine {
        &mut self.line
    }
}
