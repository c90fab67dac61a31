//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, StaticSocketErrorCode};
use super::{CatalogError, ConfigError, ExportError, ParseError, ScanError};

/// Errors that can occur during a multi-file analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl StaticSocketErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Export(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_error_code_delegates_to_subsystem() {
        let err: PipelineError = ParseError::NoTree {
            path: PathBuf::from("main.go"),
        }
        .into();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.coded_string().starts_with("[PARSE_ERROR]"));
        assert_eq!(PipelineError::Cancelled.error_code(), "CANCELLED");
    }

    #[test]
    fn test_pipeline_result_collects_errors() {
        let mut result: PipelineResult<Vec<u32>> = PipelineResult::new(vec![1]);
        assert!(result.is_clean());
        result.add_error(PipelineError::Cancelled);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.data, vec![1]);
    }
}
