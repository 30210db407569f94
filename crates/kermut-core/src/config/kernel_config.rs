use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{ConfigError, KernelError};

/// How the structure and sequence kernels are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    #[default]
    WeightedSum,
    Add,
    Multiply,
}

impl CompositionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeightedSum => "weighted_sum",
            Self::Add => "add",
            Self::Multiply => "multiply",
        }
    }
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositionMode {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted_sum" => Ok(Self::WeightedSum),
            "add" => Ok(Self::Add),
            "multiply" => Ok(Self::Multiply),
            other => Err(KernelError::UnknownComposition {
                name: other.to_string(),
            }),
        }
    }
}

/// Kernel and auxiliary-input switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    /// Load zero-shot scores as an auxiliary input.
    pub use_zero_shot: bool,
    /// Zero-shot method; selects the score subdirectory and column.
    pub zero_shot_method: Option<String>,
    /// Tokenize sequences and load embeddings for the sequence kernel.
    pub use_sequence_kernel: bool,
    /// Composition of the structure and sequence kernels.
    pub composition: CompositionMode,
}

impl KernelConfig {
    /// Score column of the configured zero-shot method, if known.
    pub fn zero_shot_column(&self) -> Option<&'static str> {
        self.zero_shot_method
            .as_deref()
            .and_then(constants::zero_shot_column)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.use_zero_shot {
            return Ok(());
        }
        let Some(method) = self.zero_shot_method.as_deref() else {
            return Err(ConfigError::ValidationFailed {
                field: "kernel.zero_shot_method".to_string(),
                message: "required when kernel.use_zero_shot is true".to_string(),
            });
        };
        if constants::zero_shot_column(method).is_none() {
            return Err(ConfigError::ValidationFailed {
                field: "kernel.zero_shot_method".to_string(),
                message: format!("unknown method '{method}'"),
            });
        }
        Ok(())
    }
}
