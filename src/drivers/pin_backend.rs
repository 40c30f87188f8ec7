//! Pin backend capability and runtime backend selection.
//!
//! A backend is the thing a [`GpioLine`](super::gpio_line::GpioLine)
//! actually talks to.  Two implementations ship:
//!
//! | Backend                          | Used when                    |
//! |----------------------------------|------------------------------|
//! | [`SysfsPin`](super::sysfs::SysfsPin)          | on the payload (`sysfs`)     |
//! | [`SimulatedPin`](super::sim_pin::SimulatedPin) | off-target (`simulated`)     |
//!
//! Backends deal in **logical** values.  Active-low translation is done
//! by the kernel (sysfs `active_low` attribute) or ignored (simulation).

use std::path::Path;

use crate::config::{BackendKind, PinConfig};
use crate::error::BackendError;

use super::sim_pin::SimulatedPin;
use super::sysfs::SysfsPin;

/// The three operations every pin backend provides.
pub trait PinBackend {
    /// Whether the pin is already present/configured (e.g. exported).
    fn is_initialized(&self) -> bool;

    /// Export the pin and configure polarity and direction.
    fn initialize(&mut self, config: &PinConfig) -> Result<(), BackendError>;

    fn set_logical_value(&mut self, on: bool) -> Result<(), BackendError>;

    fn read_logical_value(&mut self) -> Result<bool, BackendError>;
}

/// Construct the backend selected by configuration for one pin.
pub fn open(kind: BackendKind, sysfs_root: &Path, config: &PinConfig) -> Box<dyn PinBackend> {
    match kind {
        BackendKind::Sysfs => Box::new(SysfsPin::new(sysfs_root, config.pin)),
        BackendKind::Simulated => Box::new(SimulatedPin::new(config)),
    }
}
