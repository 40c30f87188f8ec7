//! Unified error types for the InTex actuation layer.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! command service sees one type no matter which actuator failed.
//! Actuator controllers do no local recovery: a fault raised by a GPIO
//! line travels unmodified up to whoever issued the command.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Error)]
pub enum Error {
    /// A GPIO write could not be verified after the bounded retry count.
    #[error("hardware fault: pin {pin} did not read back {}", on_off(*attempted))]
    HardwareFault {
        /// Kernel GPIO number of the failing line.
        pin: u32,
        /// Logical value the caller asked for.
        attempted: bool,
    },

    /// An actuator or command identifier was not recognised.
    #[error("not implemented: {0}")]
    UnsupportedOperation(String),

    /// A pin backend could not be set up or accessed.
    #[error("pin backend: {0}")]
    Backend(#[from] BackendError),

    /// More timers were requested than the queue can hold.
    #[error("timer queue full ({capacity} pending)")]
    TimerQueueFull { capacity: usize },

    /// Configuration is invalid or could not be loaded.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Backend errors
// ---------------------------------------------------------------------------

/// Failures talking to a pin backend (sysfs file tree or simulation).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading or writing a sysfs attribute failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An attribute held something other than the expected `0`/`1`.
    #[error("{}: unexpected content {content:?}", path.display())]
    Parse { path: PathBuf, content: String },
}

pub(crate) fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
