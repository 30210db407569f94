//! Kernel construction and evaluation errors.

use super::error_code::{self, KermutErrorCode};

/// Errors raised by kernels and their parameters.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("unknown composition '{name}': expected weighted_sum, add or multiply")]
    UnknownComposition { name: String },

    #[error("shape mismatch in {context}: {left} vs {right}")]
    ShapeMismatch {
        context: String,
        left: usize,
        right: usize,
    },

    #[error("parameter {name} = {value} outside [{lower}, {upper}]")]
    OutOfBounds {
        name: String,
        value: f64,
        lower: f64,
        upper: f64,
    },

    #[error("unknown parameter: {name}")]
    UnknownParameter { name: String },
}

impl KermutErrorCode for KernelError {
    fn error_code(&self) -> &'static str {
        error_code::KERNEL_ERROR
    }
}
