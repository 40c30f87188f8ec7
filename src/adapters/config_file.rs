//! JSON file adapter for [`ConfigPort`].
//!
//! A missing file yields the built-in defaults.  Anything else that
//! cannot be read or parsed is an error: the payload should not silently
//! fall back to defaults when an operator-written file is broken.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::HardwareConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<HardwareConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "ConfigFile: {} not found, using defaults",
                    self.path.display()
                );
                return Ok(HardwareConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: HardwareConfig = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Corrupted(format!("{}: {e}", self.path.display())))?;
        config.validate()?;
        info!("ConfigFile: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &HardwareConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)?;
        info!("ConfigFile: saved {}", self.path.display());
        Ok(())
    }
}
