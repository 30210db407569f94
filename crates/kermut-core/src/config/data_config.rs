use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ConfigError;

/// Filesystem locations of every input, plus embedding read retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Folder of per-dataset mutation tables (`<DMS_id>.csv`).
    #[serde(rename = "DMS_input_folder")]
    pub dms_input_folder: PathBuf,
    /// Root of per-method zero-shot score tables (`<method>/<DMS_id>.csv`).
    pub zero_shot: PathBuf,
    /// Embedding stores for multi-mutant and domain splits.
    pub embeddings_multiples: PathBuf,
    /// Embedding stores for every other split.
    pub embeddings_singles: PathBuf,
    /// Attempts at opening a locked embedding store before giving up.
    #[serde(default = "default_read_attempts")]
    pub read_attempts: u32,
    /// Fixed delay between attempts (seconds).
    #[serde(default = "default_read_retry_delay_secs")]
    pub read_retry_delay_secs: u64,
}

fn default_read_attempts() -> u32 {
    constants::DEFAULT_READ_ATTEMPTS
}

fn default_read_retry_delay_secs() -> u64 {
    constants::DEFAULT_READ_RETRY_DELAY_SECS
}

impl DataConfig {
    /// Delay between embedding read attempts.
    pub fn read_retry_delay(&self) -> Duration {
        Duration::from_secs(self.read_retry_delay_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.read_attempts == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "data.read_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
