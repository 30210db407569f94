//! Error types for every Kermut subsystem.
//!
//! Each subsystem has its own enum; `KermutError` unifies them with `From`
//! conversions so `?` works across crate boundaries.

pub mod config_error;
pub mod data_error;
pub mod error_code;
pub mod kernel_error;

pub use config_error::ConfigError;
pub use data_error::DataError;
pub use error_code::KermutErrorCode;
pub use kernel_error::KernelError;

/// Top-level error for the Kermut workspace.
#[derive(Debug, thiserror::Error)]
pub enum KermutError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}

impl KermutErrorCode for KermutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::Kernel(e) => e.error_code(),
        }
    }
}

/// Convenience alias used across the workspace.
pub type KermutResult<T> = Result<T, KermutError>;

/// Result alias for the data pipeline.
pub type DataResult<T> = Result<T, DataError>;

/// Result alias for kernel construction and evaluation.
pub type KernelResult<T> = Result<T, KernelError>;
