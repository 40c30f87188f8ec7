//! Verified GPIO output line.
//!
//! Wraps exactly one [`PinBackend`] and adds write-then-read-back
//! verification.  sysfs writes on the payload occasionally do not stick,
//! so every write is confirmed and retried up to [`WRITE_ATTEMPTS`]
//! times before a [`Error::HardwareFault`] is raised.
//!
//! The line caches nothing: every read goes to the backend.
//!
//! `GpioLine` also implements the `embedded-hal` digital traits, so the
//! PWM emulator can drive it like any other output pin.

use log::{debug, error, info, warn};

use crate::config::PinConfig;
use crate::error::{Error, Result, on_off};

use super::pin_backend::PinBackend;

/// Total write+verify attempts before giving up.
pub const WRITE_ATTEMPTS: usize = 3;

pub struct GpioLine {
    config: PinConfig,
    backend: Box<dyn PinBackend>,
}

impl GpioLine {
    pub fn new(config: PinConfig, backend: Box<dyn PinBackend>) -> Self {
        Self { config, backend }
    }

    pub fn pin(&self) -> u32 {
        self.config.pin
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Export and configure the pin unless the backend already reports it
    /// present.
    pub fn initialize(&mut self) -> Result<()> {
        if self.backend.is_initialized() {
            debug!(
                "GPIO {} ({}): already configured",
                self.config.name, self.config.pin
            );
            return Ok(());
        }

        info!(
            "Configuring GPIO {} ({}) as {}{}.",
            self.config.name,
            self.config.pin,
            self.config.direction,
            if self.config.active_low { " (active low)" } else { "" }
        );
        self.backend.initialize(&self.config)?;
        Ok(())
    }

    /// Write `on` and confirm it by reading back.
    ///
    /// Backend I/O errors count as a failed attempt, same as a mismatch.
    pub fn set_logical_value(&mut self, on: bool) -> Result<()> {
        for attempt in 1..=WRITE_ATTEMPTS {
            match self.write_and_verify(on) {
                Ok(true) => return Ok(()),
                Ok(false) => warn!(
                    "GPIO {} ({}): read-back mismatch after writing {} (attempt {}/{})",
                    self.config.name,
                    self.config.pin,
                    on_off(on),
                    attempt,
                    WRITE_ATTEMPTS
                ),
                Err(e) => warn!(
                    "GPIO {} ({}): write {} failed: {} (attempt {}/{})",
                    self.config.name,
                    self.config.pin,
                    on_off(on),
                    e,
                    attempt,
                    WRITE_ATTEMPTS
                ),
            }
        }

        error!(
            "GPIO {} ({}): could not set pin {}",
            self.config.name,
            self.config.pin,
            on_off(on)
        );
        Err(Error::HardwareFault {
            pin: self.config.pin,
            attempted: on,
        })
    }

    /// Single read, no retry.
    pub fn read_logical_value(&mut self) -> Result<bool> {
        Ok(self.backend.read_logical_value()?)
    }

    fn write_and_verify(&mut self, on: bool) -> Result<bool> {
        self.backend.set_logical_value(on)?;
        Ok(self.backend.read_logical_value()? == on)
    }
}

impl embedded_hal::digital::ErrorType for GpioLine {
    type Error = Error;
}

impl embedded_hal::digital::OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<()> {
        self.set_logical_value(false)
    }

    fn set_high(&mut self) -> Result<()> {
        self.set_logical_value(true)
    }
}

impl embedded_hal::digital::StatefulOutputPin for GpioLine {
    fn is_set_high(&mut self) -> Result<bool> {
        self.read_logical_value()
    }

    fn is_set_low(&mut self) -> Result<bool> {
        self.read_logical_value().map(|on| !on)
    }
}
