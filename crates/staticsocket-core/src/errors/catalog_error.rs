//! Pattern catalog errors.

use super::error_code::{self, StaticSocketErrorCode};

/// Errors raised while building a pattern catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate catalog pattern: {name}")]
    DuplicatePattern { name: String },

    #[error("Invalid catalog pattern {name}: {message}")]
    InvalidPattern { name: String, message: String },
}

impl StaticSocketErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOG_ERROR
    }
}
