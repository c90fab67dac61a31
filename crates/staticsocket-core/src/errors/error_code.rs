//! Stable error codes for callers that match on failures programmatically.

/// Every error enum implements this to expose a structured error code string.
pub trait StaticSocketErrorCode {
    /// Returns the error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CATALOG_ERROR: &str = "CATALOG_ERROR";
pub const EXPORT_ERROR: &str = "EXPORT_ERROR";
pub const CANCELLED: &str = "CANCELLED";
