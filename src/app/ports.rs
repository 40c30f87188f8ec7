//! Port traits: the hexagonal boundary between actuator logic and the
//! outside world.
//!
//! ```text
//!   CommandService ──▶ HardwarePort ──▶ Actuator ──▶ GpioLine ──▶ PinBackend
//!                                          │
//!                                          └──▶ Scheduler (timer port)
//! ```
//!
//! Controllers never own an event loop.  They ask a [`Scheduler`] for a
//! callback after some duration and receive it later through
//! [`Actuator::on_timer`].  This keeps the cooperative concurrency model
//! out of the controllers and lets tests drive time explicitly.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::config::HardwareConfig;
use crate::drivers::gpio_line::GpioLine;
use crate::error::Result;
use crate::events::{ActuatorId, TimerEvent, TimerKind};

// ───────────────────────────────────────────────────────────────
// Scheduler port
// ───────────────────────────────────────────────────────────────

/// Opaque identity of one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub(crate) u64);

/// Schedule-after-duration / cancel, as seen by the controllers.
///
/// Implementations deliver each scheduled [`TimerEvent`] exactly once,
/// on the same thread as every other actuator call, unless it was
/// cancelled first.
pub trait Scheduler {
    /// Arrange for `event` to fire `after` from now.
    fn schedule(&mut self, after: Duration, event: TimerEvent) -> Result<TimerHandle>;

    /// Drop a pending callback.  Returns `false` if it already fired or
    /// was never scheduled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port
// ───────────────────────────────────────────────────────────────

/// Uniform surface of the valve, heater, and burnwire controllers.
pub trait Actuator {
    /// Export and configure the underlying line.  Idempotent.
    fn initialize(&mut self) -> Result<()>;

    /// Command the actuator on or off.  GPIO faults propagate.
    fn set(&mut self, on: bool, timers: &mut dyn Scheduler) -> Result<()>;

    /// A timer this actuator scheduled has expired.
    fn on_timer(
        &mut self,
        handle: TimerHandle,
        kind: TimerKind,
        timers: &mut dyn Scheduler,
    ) -> Result<()>;

    /// Whether the actuator is currently commanded on.
    fn is_active(&self) -> bool;

    /// The GPIO line driven by this actuator.
    fn line_mut(&mut self) -> &mut GpioLine;
}

// ───────────────────────────────────────────────────────────────
// Hardware port
// ───────────────────────────────────────────────────────────────

/// One row of a status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorStatus {
    pub id: ActuatorId,
    pub name: String,
    pub pin: u32,
    pub active: bool,
}

impl fmt::Display for ActuatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:<10} gpio{:<3} {}",
            self.id.as_str(),
            self.name,
            self.pin,
            if self.active { "active" } else { "idle" }
        )
    }
}

/// What the command service needs from the actuation core.
pub trait HardwarePort {
    fn set(&mut self, id: ActuatorId, on: bool) -> Result<()>;

    /// Heaters only; anything else is `UnsupportedOperation`.
    fn temperature_changed(&mut self, id: ActuatorId, celsius: i32) -> Result<()>;

    fn status(&mut self) -> Vec<ActuatorStatus>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists hardware configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`HardwareConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> core::result::Result<HardwareConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &HardwareConfig) -> core::result::Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    #[error("config corrupted: {0}")]
    Corrupted(String),
    /// A config field failed range validation.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    /// Underlying storage could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
