//! Actuator identities and timer events.
//!
//! Timer callbacks do not capture controller references.  Each pending
//! timer carries a [`TimerEvent`] naming its owner and purpose; the
//! hardware context routes it back to the right controller when it
//! expires.
//!
//! ```text
//! ┌──────────────┐   schedule(TimerEvent)   ┌──────────────┐
//! │  Controller  │─────────────────────────▶│  TimerQueue  │
//! │ (valve/...)  │◀─────────────────────────│              │
//! └──────────────┘  on_timer(handle, kind)  └──────────────┘
//!          ▲                                        │ pop_due
//!          └──────────── HardwareContext ◀──────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The five actuators on the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorId {
    PressureTankValve,
    OutletValve,
    InnerHeater,
    OuterHeater,
    Burnwire,
}

impl ActuatorId {
    pub const ALL: [Self; 5] = [
        Self::PressureTankValve,
        Self::OutletValve,
        Self::InnerHeater,
        Self::OuterHeater,
        Self::Burnwire,
    ];

    /// Canonical identifier used by the command protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PressureTankValve => "pressure_tank_valve",
            Self::OutletValve => "outlet_valve",
            Self::InnerHeater => "inner_heater",
            Self::OuterHeater => "outer_heater",
            Self::Burnwire => "burnwire",
        }
    }

    pub fn is_heater(self) -> bool {
        matches!(self, Self::InnerHeater | Self::OuterHeater)
    }
}

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActuatorId {
    type Err = Error;

    /// Accepts the canonical names and the port aliases used by the
    /// ground station (`valve0`, `heater1`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pressure_tank_valve" | "valve0" => Ok(Self::PressureTankValve),
            "outlet_valve" | "valve1" => Ok(Self::OutletValve),
            "inner_heater" | "heater0" => Ok(Self::InnerHeater),
            "outer_heater" | "heater1" => Ok(Self::OuterHeater),
            "burnwire" => Ok(Self::Burnwire),
            other => Err(Error::UnsupportedOperation(format!("GPIO {other:?}"))),
        }
    }
}

/// What a pending timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Next PWM phase transition.
    PwmCycle,
    /// Heater safety watchdog expiry.
    Watchdog,
    /// Burnwire automatic shutoff.
    Shutoff,
}

/// Routing record carried by every scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub target: ActuatorId,
    pub kind: TimerKind,
}

impl TimerEvent {
    pub fn new(target: ActuatorId, kind: TimerKind) -> Self {
        Self { target, kind }
    }
}
