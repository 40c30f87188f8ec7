//! System configuration parameters
//!
//! Pin assignments, PWM timing, thermostat thresholds, and logging
//! destinations for the payload.  [`HardwareConfig::default`] reproduces
//! the reference deployment; a JSON file loaded through
//! [`ConfigPort`](crate::app::ports::ConfigPort) may override any field.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

// ---------------------------------------------------------------------------
// Pins
// ---------------------------------------------------------------------------

/// Signal direction of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// The string the kernel expects in the `direction` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical GPIO line.  Fixed at construction, owned by exactly one
/// controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Kernel GPIO number.
    pub pin: u32,
    /// Human-readable name used in log lines.
    pub name: String,
    pub direction: Direction,
    /// Logical "on" drives the line low.
    pub active_low: bool,
}

impl PinConfig {
    pub fn output(pin: u32, name: &str, active_low: bool) -> Self {
        Self {
            pin,
            name: name.to_owned(),
            direction: Direction::Out,
            active_low,
        }
    }
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which pin backend drives the lines.  Chosen at runtime so the same
/// binary runs on the payload and on a development host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Kernel sysfs GPIO file tree.
    #[default]
    Sysfs,
    /// In-memory lines that only log what they would do.
    Simulated,
}

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Software PWM timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PwmConfig {
    /// Full on+off cycle length (milliseconds).
    pub period_ms: u64,
    /// Fraction of the period spent "on" (0.0-1.0).
    pub duty: f64,
}

impl PwmConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            period_ms: 2_000,
            duty: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveConfig {
    pub pin: PinConfig,
    #[serde(default)]
    pub pwm: PwmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterConfig {
    pub pin: PinConfig,
    #[serde(default)]
    pub pwm: PwmConfig,
    /// Below this temperature (°C) the thermostat switches on.
    pub low_c: i32,
    /// Above this temperature (°C) the thermostat switches off.
    pub high_c: i32,
    /// Maximum on-time per arming of the safety watchdog (milliseconds).
    pub watchdog_ms: u64,
}

impl HeaterConfig {
    pub fn watchdog(&self) -> Duration {
        Duration::from_millis(self.watchdog_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnwireConfig {
    pub pin: PinConfig,
    /// Automatic shutoff delay after energising (milliseconds).
    pub pulse_ms: u64,
}

impl BurnwireConfig {
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    /// TCP endpoint receiving a copy of every log line.
    pub syslog_addr: Option<String>,
    /// Removable-media log directory; `{}` is replaced by the location index.
    pub media_dir_pattern: String,
    /// Number of redundant media locations probed at startup.
    pub media_locations: u8,
    /// Log files are named `<prefix>.<n>.log`.
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Debug,
            syslog_addr: Some("localhost:4003".into()),
            media_dir_pattern: "/media/usb{}/log".into(),
            media_locations: 2,
            file_prefix: "intex".into(),
        }
    }
}

impl LoggingConfig {
    /// Directory of media location `index`.
    pub fn media_dir(&self, index: u8) -> PathBuf {
        PathBuf::from(self.media_dir_pattern.replace("{}", &index.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// Complete hardware configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub backend: BackendKind,
    /// Root of the sysfs GPIO tree (holds `export` and `gpio<N>/`).
    pub sysfs_root: PathBuf,

    pub pressure_tank_valve: ValveConfig,
    pub outlet_valve: ValveConfig,
    pub inner_heater: HeaterConfig,
    pub outer_heater: HeaterConfig,
    pub burnwire: BurnwireConfig,

    pub logging: LoggingConfig,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        let heater = |pin, name| HeaterConfig {
            pin: PinConfig::output(pin, name, pins::OUTPUTS_ACTIVE_LOW),
            pwm: PwmConfig::default(),
            low_c: 5,
            high_c: 20,
            watchdog_ms: 10_000,
        };

        Self {
            backend: BackendKind::Sysfs,
            sysfs_root: PathBuf::from("/sys/class/gpio"),

            pressure_tank_valve: ValveConfig {
                pin: PinConfig::output(
                    pins::PRESSURE_TANK_VALVE_GPIO,
                    "VALVE1",
                    pins::OUTPUTS_ACTIVE_LOW,
                ),
                pwm: PwmConfig::default(),
            },
            outlet_valve: ValveConfig {
                pin: PinConfig::output(pins::OUTLET_VALVE_GPIO, "VALVE2", pins::OUTPUTS_ACTIVE_LOW),
                pwm: PwmConfig::default(),
            },
            inner_heater: heater(pins::INNER_HEATER_GPIO, "Heater 0"),
            outer_heater: heater(pins::OUTER_HEATER_GPIO, "Heater 1"),
            burnwire: BurnwireConfig {
                pin: PinConfig::output(pins::BURNWIRE_GPIO, "Burnwire", pins::OUTPUTS_ACTIVE_LOW),
                pulse_ms: 10_000,
            },

            logging: LoggingConfig::default(),
        }
    }
}

impl HardwareConfig {
    /// Every pin in the configuration, in actuator order.
    pub fn pins(&self) -> [&PinConfig; 5] {
        [
            &self.pressure_tank_valve.pin,
            &self.outlet_valve.pin,
            &self.inner_heater.pin,
            &self.outer_heater.pin,
            &self.burnwire.pin,
        ]
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for pin in self.pins() {
            if pin.name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "pin {} has an empty name",
                    pin.pin
                )));
            }
            if !seen.insert(pin.pin) {
                return Err(ConfigError::ValidationFailed(format!(
                    "pin {} is assigned to more than one actuator",
                    pin.pin
                )));
            }
        }

        for (name, pwm) in [
            ("pressure_tank_valve", &self.pressure_tank_valve.pwm),
            ("outlet_valve", &self.outlet_valve.pwm),
            ("inner_heater", &self.inner_heater.pwm),
            ("outer_heater", &self.outer_heater.pwm),
        ] {
            if pwm.period_ms == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name}: PWM period must be non-zero"
                )));
            }
            if !(0.0..=1.0).contains(&pwm.duty) {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name}: PWM duty {} outside 0.0-1.0",
                    pwm.duty
                )));
            }
        }

        for (name, heater) in [
            ("inner_heater", &self.inner_heater),
            ("outer_heater", &self.outer_heater),
        ] {
            if heater.low_c >= heater.high_c {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name}: low threshold {} must be below high threshold {}",
                    heater.low_c, heater.high_c
                )));
            }
            if heater.watchdog_ms == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name}: watchdog timeout must be non-zero"
                )));
            }
        }

        if self.burnwire.pulse_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "burnwire: pulse must be non-zero".into(),
            ));
        }

        Ok(())
    }
}
