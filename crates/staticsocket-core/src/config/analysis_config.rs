//! Analysis configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{Direction, Protocol};

/// What a multi-file run does when one file cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole run on the first unparsable file.
    #[default]
    FailFast,
    /// Skip the file, record the error, keep going.
    SkipAndReport,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(Self::FailFast),
            "skip_and_report" => Ok(Self::SkipAndReport),
            other => Err(ConfigError::InvalidValue {
                field: "analysis.failure_policy".to_string(),
                message: format!("unknown policy '{other}'"),
            }),
        }
    }
}

/// How selector call names are matched against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Purely textual `receiver.member` matching.
    #[default]
    Lexical,
    /// The receiver must be the local name of an import in the same file.
    RequireImport,
}

impl FromStr for ImportPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "lexical" => Ok(Self::Lexical),
            "require_import" => Ok(Self::RequireImport),
            other => Err(ConfigError::InvalidValue {
                field: "analysis.import_policy".to_string(),
                message: format!("unknown policy '{other}'"),
            }),
        }
    }
}

/// A user-supplied catalog entry.
///
/// ```toml
/// [[analysis.patterns]]
/// name = "redis.Dial"
/// direction = "egress"
/// protocol = "tcp"
/// address_arg = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub direction: Direction,
    pub protocol: Protocol,
    pub address_arg: usize,
    #[serde(default)]
    pub address_is_url: bool,
}

/// Configuration for the detection-and-resolution engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub failure_policy: Option<FailurePolicy>,
    pub import_policy: Option<ImportPolicy>,
    /// Enable name and call-result heuristics in the resolver. Default: true.
    pub heuristics: Option<bool>,
    /// Extra catalog entries, added on top of the built-in catalog.
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

impl AnalysisConfig {
    pub fn effective_failure_policy(&self) -> FailurePolicy {
        self.failure_policy.unwrap_or_default()
    }

    pub fn effective_import_policy(&self) -> ImportPolicy {
        self.import_policy.unwrap_or_default()
    }

    pub fn effective_heuristics(&self) -> bool {
        self.heuristics.unwrap_or(true)
    }
}
