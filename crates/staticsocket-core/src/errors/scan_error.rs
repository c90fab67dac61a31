//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, StaticSocketErrorCode};

/// Errors that can occur while discovering source files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Path does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Walk error under {root}: {message}")]
    Walk { root: PathBuf, message: String },

    #[error("Invalid ignore pattern {pattern}: {message}")]
    InvalidIgnore { pattern: String, message: String },
}

impl StaticSocketErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
