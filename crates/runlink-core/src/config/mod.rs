//! runlink configuration, loaded from `runlink.toml`.

pub mod mapping_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::CorrelationSettings;

pub use mapping_config::MappingConfig;
pub use storage_config::StorageConfig;

/// Upper bound on reader connections per pool.
pub const MAX_READ_POOL_SIZE: usize = 32;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RunlinkConfig {
    pub correlation: CorrelationSettings,
    pub storage: StorageConfig,
    pub mapping: MappingConfig,
}

impl RunlinkConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.read_pool_size > MAX_READ_POOL_SIZE {
            return Err(ConfigError::Invalid {
                field: "storage.read_pool_size".to_string(),
                reason: format!(
                    "{} exceeds the maximum of {}",
                    self.storage.read_pool_size, MAX_READ_POOL_SIZE
                ),
            });
        }
        if self.mapping.sweep_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "mapping.sweep_page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
