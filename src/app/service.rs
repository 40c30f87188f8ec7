//! Command service: the operator-facing edge of the actuation core.
//!
//! [`CommandService`] turns parsed [`Command`]s into calls on a
//! [`HardwarePort`] and every outcome into a [`Reply`].  Faults are not
//! recovered here; they are reported to the operator verbatim.
//!
//! ```text
//!  "set valve0 on" ──▶ ┌────────────────┐ ──▶ HardwarePort
//!                      │ CommandService │
//!        Reply    ◀─── └────────────────┘
//! ```

use std::fmt;

use log::{info, warn};

use super::commands::Command;
use super::ports::{ActuatorStatus, HardwarePort};
use crate::error::Error;

/// Operator-visible outcome of one command.
#[derive(Debug)]
pub enum Reply {
    Ok,
    Status(Vec<ActuatorStatus>),
    Failed(Error),
    /// The operator asked to leave; the caller shuts down.
    Bye,
}

impl Reply {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Status(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{row}")?;
                }
                Ok(())
            }
            Self::Failed(e) => write!(f, "error: {e}"),
            Self::Bye => f.write_str("bye"),
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandService {
    handled: u64,
    failed: u64,
}

impl CommandService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and execute one protocol line.
    pub fn handle_line(&mut self, hw: &mut impl HardwarePort, line: &str) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => self.execute(hw, command),
            Err(e) => self.fail(line, e),
        }
    }

    pub fn execute(&mut self, hw: &mut impl HardwarePort, command: Command) -> Reply {
        info!("CommandService: {command:?}");
        let outcome = match command {
            Command::Set { target, on } => hw.set(target, on).map(|()| Reply::Ok),
            Command::Temperature { target, celsius } => {
                hw.temperature_changed(target, celsius).map(|()| Reply::Ok)
            }
            Command::Status => Ok(Reply::Status(hw.status())),
            Command::Quit => Ok(Reply::Bye),
        };
        match outcome {
            Ok(reply) => {
                self.handled += 1;
                reply
            }
            Err(e) => self.fail(&format!("{command:?}"), e),
        }
    }

    /// Commands executed successfully, and commands that failed.
    pub fn counts(&self) -> (u64, u64) {
        (self.handled, self.failed)
    }

    fn fail(&mut self, what: &str, e: Error) -> Reply {
        self.failed += 1;
        warn!("CommandService: {} failed: {e}", what.trim());
        Reply::Failed(e)
    }
}
