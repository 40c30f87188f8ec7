//! Kernel sysfs GPIO backend.
//!
//! ```text
//! <root>/export               write "<N>" to create gpio<N>/
//! <root>/gpio<N>/active_low   "0" | "1"
//! <root>/gpio<N>/direction    "in" | "out"
//! <root>/gpio<N>/value        "0" | "1"   (logical, after active_low)
//! ```
//!
//! `<root>` is `/sys/class/gpio` on the payload.  It is configurable so
//! the backend can be exercised against an ordinary directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::PinConfig;
use crate::error::BackendError;

use super::pin_backend::PinBackend;

/// Attributes of an exported pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    ActiveLow,
    Direction,
    Value,
}

impl Attribute {
    fn file_name(self) -> &'static str {
        match self {
            Self::ActiveLow => "active_low",
            Self::Direction => "direction",
            Self::Value => "value",
        }
    }
}

/// One pin in the sysfs GPIO tree.
pub struct SysfsPin {
    root: PathBuf,
    pin: u32,
}

impl SysfsPin {
    pub fn new(root: &Path, pin: u32) -> Self {
        Self {
            root: root.to_path_buf(),
            pin,
        }
    }

    /// `<root>/gpio<N>`.
    pub fn pin_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    fn attribute_path(&self, attr: Attribute) -> PathBuf {
        self.pin_dir().join(attr.file_name())
    }

    fn export(&self) -> Result<(), BackendError> {
        if self.pin_dir().exists() {
            return Ok(());
        }
        let path = self.root.join("export");
        debug!("sysfs: exporting GPIO {}", self.pin);
        write_file(&path, &self.pin.to_string())
    }

    fn set_attribute(&self, attr: Attribute, value: &str) -> Result<(), BackendError> {
        write_file(&self.attribute_path(attr), value)
    }
}

fn write_file(path: &Path, value: &str) -> Result<(), BackendError> {
    fs::write(path, format!("{value}\n")).map_err(|source| BackendError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl PinBackend for SysfsPin {
    fn is_initialized(&self) -> bool {
        self.pin_dir().is_dir()
    }

    fn initialize(&mut self, config: &PinConfig) -> Result<(), BackendError> {
        self.export()?;
        self.set_attribute(Attribute::ActiveLow, if config.active_low { "1" } else { "0" })?;
        self.set_attribute(Attribute::Direction, config.direction.as_str())
    }

    fn set_logical_value(&mut self, on: bool) -> Result<(), BackendError> {
        self.set_attribute(Attribute::Value, if on { "1" } else { "0" })
    }

    fn read_logical_value(&mut self) -> Result<bool, BackendError> {
        let path = self.attribute_path(Attribute::Value);
        let content = fs::read_to_string(&path).map_err(|source| BackendError::Io {
            path: path.clone(),
            source,
        })?;
        match content.trim().parse::<i32>() {
            Ok(v) => Ok(v != 0),
            Err(_) => Err(BackendError::Parse {
                path,
                content: content.trim().to_owned(),
            }),
        }
    }
}
