//! Simulated pin backend for hardware-less runs.
//!
//! Tracks the logical value in memory and logs every intent instead of
//! touching a device.  Reads return the last value written (default off).

use log::debug;

use crate::config::{Direction, PinConfig};
use crate::error::BackendError;

use super::pin_backend::PinBackend;

pub struct SimulatedPin {
    name: String,
    pin: u32,
    direction: Direction,
    active_low: bool,
    initialized: bool,
    state: bool,
}

impl SimulatedPin {
    pub fn new(config: &PinConfig) -> Self {
        Self {
            name: config.name.clone(),
            pin: config.pin,
            direction: config.direction,
            active_low: config.active_low,
            initialized: false,
            state: false,
        }
    }
}

impl PinBackend for SimulatedPin {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self, _config: &PinConfig) -> Result<(), BackendError> {
        debug!(
            "sim: initializing pin {} ({}) as {}{}",
            self.name,
            self.pin,
            self.direction,
            if self.active_low { " (active_low)" } else { "" }
        );
        self.initialized = true;
        Ok(())
    }

    fn set_logical_value(&mut self, on: bool) -> Result<(), BackendError> {
        self.state = on;
        debug!("sim: setting pin {} ({}) {}", self.name, self.pin, on);
        Ok(())
    }

    fn read_logical_value(&mut self) -> Result<bool, BackendError> {
        debug!("sim: reading pin {} ({}) as {}", self.name, self.pin, self.state);
        Ok(self.state)
    }
}
