//! Stable error code strings for logs and the CLI exit report.

/// Every error enum maps each variant to a stable code string.
pub trait KermutErrorCode {
    /// Returns the error code string (e.g., "DATA_NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted report string: `[ERROR_CODE] message`.
    fn report(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DATA_NOT_FOUND: &str = "DATA_NOT_FOUND";
pub const DATA_ERROR: &str = "DATA_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
pub const KERNEL_ERROR: &str = "KERNEL_ERROR";
