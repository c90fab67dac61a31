//! Export errors.

use super::error_code::{self, StaticSocketErrorCode};

/// Errors that can occur while writing an analysis result.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

impl StaticSocketErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        error_code::EXPORT_ERROR
    }
}
