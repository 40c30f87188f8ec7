//! Hardware context: the single owner of every actuator and the timer
//! queue they share.
//!
//! Constructed once at startup and passed by reference to the command
//! service and the temperature feed.  Each actuator exists exactly once;
//! accessors always hand back the same instance.
//!
//! ```text
//!   CommandService ──set / temperature──▶ ┌──────────────────────┐
//!                                         │   HardwareContext    │
//!   event loop ──────advance_to(now)────▶ │ valves · heaters ·   │
//!                                         │ burnwire · TimerQueue│
//!                                         └──────────┬───────────┘
//!                                                    ▼
//!                                              GpioLine × 5
//! ```

use std::time::Duration;

use log::{error, info};

use crate::app::ports::{Actuator, ActuatorStatus, HardwarePort};
use crate::config::{HardwareConfig, PinConfig};
use crate::drivers::burnwire::Burnwire;
use crate::drivers::heater::Heater;
use crate::drivers::pin_backend::{self, PinBackend};
use crate::drivers::valve::Valve;
use crate::error::{Error, Result};
use crate::events::ActuatorId;
use crate::scheduler::TimerQueue;

pub struct HardwareContext {
    timers: TimerQueue,
    pressure_tank_valve: Valve,
    outlet_valve: Valve,
    inner_heater: Heater,
    outer_heater: Heater,
    burnwire: Burnwire,
}

impl HardwareContext {
    /// Build every actuator on the backend named in `config`.
    pub fn new(config: &HardwareConfig) -> Self {
        Self::with_backends(config, |pin| {
            pin_backend::open(config.backend, &config.sysfs_root, pin)
        })
    }

    /// Build every actuator, asking `open` for each pin's backend.
    pub fn with_backends<F>(config: &HardwareConfig, mut open: F) -> Self
    where
        F: FnMut(&PinConfig) -> Box<dyn PinBackend>,
    {
        Self {
            timers: TimerQueue::new(),
            pressure_tank_valve: Valve::new(
                ActuatorId::PressureTankValve,
                &config.pressure_tank_valve,
                open(&config.pressure_tank_valve.pin),
            ),
            outlet_valve: Valve::new(
                ActuatorId::OutletValve,
                &config.outlet_valve,
                open(&config.outlet_valve.pin),
            ),
            inner_heater: Heater::new(
                ActuatorId::InnerHeater,
                &config.inner_heater,
                open(&config.inner_heater.pin),
            ),
            outer_heater: Heater::new(
                ActuatorId::OuterHeater,
                &config.outer_heater,
                open(&config.outer_heater.pin),
            ),
            burnwire: Burnwire::new(&config.burnwire, open(&config.burnwire.pin)),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise every line.  A line that fails is reported and left
    /// unconfigured; its first write will then fault.
    pub fn initialize_all(&mut self) -> Vec<Error> {
        let mut failures = Vec::new();
        for id in ActuatorId::ALL {
            if let Err(e) = self.actuator_mut(id).initialize() {
                error!("Hardware: {id} failed to initialise: {e}");
                failures.push(e);
            }
        }
        info!(
            "Hardware: {} of {} lines ready",
            ActuatorId::ALL.len() - failures.len(),
            ActuatorId::ALL.len()
        );
        failures
    }

    /// Command every actuator off.  Keeps going past failures.
    pub fn all_off(&mut self) -> Vec<Error> {
        let mut failures = Vec::new();
        for id in ActuatorId::ALL {
            if let Err(e) = self.set(id, false) {
                error!("Hardware: {id} could not be turned off: {e}");
                failures.push(e);
            }
        }
        failures
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn set(&mut self, id: ActuatorId, on: bool) -> Result<()> {
        let (actuator, timers) = self.split(id);
        actuator.set(on, timers)
    }

    /// Route a temperature sample (°C) to a heater's thermostat.
    pub fn temperature_changed(&mut self, id: ActuatorId, celsius: i32) -> Result<()> {
        let heater = match id {
            ActuatorId::InnerHeater => &mut self.inner_heater,
            ActuatorId::OuterHeater => &mut self.outer_heater,
            other => {
                return Err(Error::UnsupportedOperation(format!(
                    "temperature feed for {other}"
                )));
            }
        };
        heater.temperature_changed(celsius, &mut self.timers)
    }

    /// Read the line back directly from its backend.
    pub fn read(&mut self, id: ActuatorId) -> Result<bool> {
        self.actuator_mut(id).line_mut().read_logical_value()
    }

    pub fn status(&mut self) -> Vec<ActuatorStatus> {
        ActuatorId::ALL
            .into_iter()
            .map(|id| {
                let actuator = self.actuator_mut(id);
                let active = actuator.is_active();
                let line = actuator.line_mut();
                ActuatorStatus {
                    id,
                    name: line.name().to_owned(),
                    pin: line.pin(),
                    active,
                }
            })
            .collect()
    }

    // ── Timers ────────────────────────────────────────────────

    /// Fire every timer due at or before `now`, in deadline order.
    ///
    /// Callbacks run at `now`: a late call fires each overdue timer once
    /// and re-arms it from `now`, so a stalled loop never replays phases.
    ///
    /// Faults raised by timer callbacks have no caller to propagate to:
    /// they are logged and handed back.
    pub fn advance_to(&mut self, now: Duration) -> Vec<Error> {
        let mut failures = Vec::new();
        while let Some((handle, event)) = self.timers.pop_due(now) {
            let (actuator, timers) = self.split(event.target);
            if let Err(e) = actuator.on_timer(handle, event.kind, timers) {
                error!("Hardware: {} {:?} timer failed: {e}", event.target, event.kind);
                failures.push(e);
            }
        }
        self.timers.set_now(now);
        failures
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn valve(&self, id: ActuatorId) -> Option<&Valve> {
        match id {
            ActuatorId::PressureTankValve => Some(&self.pressure_tank_valve),
            ActuatorId::OutletValve => Some(&self.outlet_valve),
            _ => None,
        }
    }

    pub fn heater(&self, id: ActuatorId) -> Option<&Heater> {
        match id {
            ActuatorId::InnerHeater => Some(&self.inner_heater),
            ActuatorId::OuterHeater => Some(&self.outer_heater),
            _ => None,
        }
    }

    pub fn burnwire(&self) -> &Burnwire {
        &self.burnwire
    }

    fn actuator_mut(&mut self, id: ActuatorId) -> &mut dyn Actuator {
        self.split(id).0
    }

    /// Disjoint borrows of one actuator and the shared timer queue.
    fn split(&mut self, id: ActuatorId) -> (&mut dyn Actuator, &mut TimerQueue) {
        let actuator: &mut dyn Actuator = match id {
            ActuatorId::PressureTankValve => &mut self.pressure_tank_valve,
            ActuatorId::OutletValve => &mut self.outlet_valve,
            ActuatorId::InnerHeater => &mut self.inner_heater,
            ActuatorId::OuterHeater => &mut self.outer_heater,
            ActuatorId::Burnwire => &mut self.burnwire,
        };
        (actuator, &mut self.timers)
    }
}

impl HardwarePort for HardwareContext {
    fn set(&mut self, id: ActuatorId, on: bool) -> Result<()> {
        HardwareContext::set(self, id, on)
    }

    fn temperature_changed(&mut self, id: ActuatorId, celsius: i32) -> Result<()> {
        HardwareContext::temperature_changed(self, id, celsius)
    }

    fn status(&mut self) -> Vec<ActuatorStatus> {
        HardwareContext::status(self)
    }
}
