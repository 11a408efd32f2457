use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::VendingError;
use crate::utils::{ensure_dir, write_atomic, PathResolver};

/// Operator preferences, kept as pretty JSON next to the machine data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub quiet_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            data_dir: None,
            quiet_mode: false,
        }
    }
}

/// Loads and saves [`Config`] under the resolved base directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, VendingError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, VendingError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, VendingError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, VendingError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), VendingError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}
