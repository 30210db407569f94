//! # kermut-core
//!
//! Foundation crate for the Kermut mutation-effect model.
//! Defines the typed configuration, errors, constants, and tracing setup
//! shared by the data and kernel crates.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::{CompositionMode, DataConfig, KermutConfig, KernelConfig, Split};
pub use errors::{ConfigError, DataError, KermutError, KermutResult, KernelError};
