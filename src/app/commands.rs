//! Inbound commands to the command service.
//!
//! These are the operator requests the remote interface forwards into
//! the actuation core.  The wire form is one command per line:
//!
//! ```text
//! set <actuator> <on|off>
//! temperature <heater> <celsius>
//! status
//! quit
//! ```

use std::str::FromStr;

use crate::error::Error;
use crate::events::ActuatorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch an actuator on or off.
    Set { target: ActuatorId, on: bool },

    /// Push a temperature sample (°C) to a heater's thermostat.
    Temperature { target: ActuatorId, celsius: i32 },

    /// Report every actuator's state.
    Status,

    /// Turn everything off and leave the event loop.
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let malformed = || Error::UnsupportedOperation(format!("command {:?}", line.trim()));

        match words.as_slice() {
            [verb, target, state] if verb.eq_ignore_ascii_case("set") => Ok(Self::Set {
                target: target.parse()?,
                on: parse_on_off(state).ok_or_else(malformed)?,
            }),
            [verb, target, value] if verb.eq_ignore_ascii_case("temperature") => {
                Ok(Self::Temperature {
                    target: target.parse()?,
                    celsius: value.parse().map_err(|_| malformed())?,
                })
            }
            [verb] if verb.eq_ignore_ascii_case("status") => Ok(Self::Status),
            [verb] if verb.eq_ignore_ascii_case("quit") || verb.eq_ignore_ascii_case("exit") => {
                Ok(Self::Quit)
            }
            _ => Err(malformed()),
        }
    }
}

fn parse_on_off(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "open" => Some(true),
        "off" | "0" | "false" | "close" => Some(false),
        _ => None,
    }
}
