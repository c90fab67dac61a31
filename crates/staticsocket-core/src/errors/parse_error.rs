//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, StaticSocketErrorCode};

/// Errors that can occur while turning a source file into a syntax tree.
/// Any of these is terminal for the file it names.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar could not be loaded: {message}")]
    ParserUnavailable { message: String },

    #[error("Malformed syntax tree in {path} at line {line}: {message}")]
    Malformed {
        path: PathBuf,
        line: u32,
        message: String,
    },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ParseError {
    /// The file this error is about, when it names one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::ParserUnavailable { .. } => None,
            Self::Malformed { path, .. } | Self::NoTree { path } | Self::Io { path, .. } => {
                Some(path)
            }
        }
    }
}

impl StaticSocketErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
