//! Typed configuration for a Kermut run.
//!
//! Loaded from TOML. Unknown keys and missing required keys are rejected
//! while parsing; cross-field checks run in [`KermutConfig::validate`].

mod data_config;
mod kernel_config;
mod split;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ConfigError;

pub use data_config::DataConfig;
pub use kernel_config::{CompositionMode, KernelConfig};
pub use split::Split;

const INLINE_SOURCE: &str = "<inline>";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KermutConfig {
    /// Column of the mutation table holding the full mutated sequence.
    #[serde(default = "default_sequence_col")]
    pub sequence_col: String,
    /// Active data split; selects the embedding directory.
    pub split: Split,
    #[serde(default)]
    pub kernel: KernelConfig,
    pub data: DataConfig,
}

fn default_sequence_col() -> String {
    constants::DEFAULT_SEQUENCE_COL.to_string()
}

impl KermutConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, INLINE_SOURCE)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(toml_str: &str, source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: source.to_string(),
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence_col.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "sequence_col".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.kernel.validate()?;
        self.data.validate()?;
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            path: INLINE_SOURCE.to_string(),
            message: e.to_string(),
        })
    }
}
