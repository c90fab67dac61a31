//! Top-level staticsocket configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    AnalysisConfig, FailurePolicy, ImportPolicy, OutputConfig, OutputFormat, ScanConfig,
};
use crate::errors::ConfigError;

/// Name of the project config file looked up in the analysis root.
pub const PROJECT_CONFIG_FILE: &str = "staticsocket.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`STATICSOCKET_*`)
/// 3. Project config (`staticsocket.toml` in the analysis root)
/// 4. User config (`~/.staticsocket/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaticSocketConfig {
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub scan_max_file_size: Option<u64>,
    pub scan_threads: Option<usize>,
    pub failure_policy: Option<FailurePolicy>,
    pub import_policy: Option<ImportPolicy>,
    pub output_format: Option<OutputFormat>,
    pub output_path: Option<PathBuf>,
}

impl StaticSocketConfig {
    /// Load configuration for an analysis rooted at `root` (a file or directory).
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        ::tracing::warn!(path = %user_config_path.display(), error = %err, "ignoring user config");
                    }
                }
            }
        }

        // Layer 3: project config, or an explicit --config file in its place
        let explicit = cli_overrides.and_then(|cli| cli.config_file.clone());
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, &path)?;
            }
            None => {
                let project_config_path = Self::project_dir(root).join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &StaticSocketConfig) -> Result<(), ConfigError> {
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for pattern in &config.analysis.patterns {
            let name = pattern.name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.patterns.name".to_string(),
                    message: format!("'{}' is not a call name", pattern.name),
                });
            }
        }
        Ok(())
    }

    /// Directory holding the project config for a file or directory root.
    fn project_dir(root: &Path) -> PathBuf {
        if root.is_file() {
            root.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            root.to_path_buf()
        }
    }

    /// Returns the user config path: `~/.staticsocket/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".staticsocket").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut StaticSocketConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: StaticSocketConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`. `Some` values in `other` win; catalog
    /// patterns are merged by name with `other` replacing same-named entries.
    fn merge(base: &mut StaticSocketConfig, other: &StaticSocketConfig) {
        // Scan
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if !other.scan.extra_ignore.is_empty() {
            base.scan.extra_ignore = other.scan.extra_ignore.clone();
        }
        if other.scan.follow_symlinks.is_some() {
            base.scan.follow_symlinks = other.scan.follow_symlinks;
        }
        if other.scan.include_vendor.is_some() {
            base.scan.include_vendor = other.scan.include_vendor;
        }
        if other.scan.include_tests.is_some() {
            base.scan.include_tests = other.scan.include_tests;
        }

        // Analysis
        if other.analysis.failure_policy.is_some() {
            base.analysis.failure_policy = other.analysis.failure_policy;
        }
        if other.analysis.import_policy.is_some() {
            base.analysis.import_policy = other.analysis.import_policy;
        }
        if other.analysis.heuristics.is_some() {
            base.analysis.heuristics = other.analysis.heuristics;
        }
        for pattern in &other.analysis.patterns {
            base.analysis.patterns.retain(|p| p.name != pattern.name);
            base.analysis.patterns.push(pattern.clone());
        }

        // Output
        if other.output.format.is_some() {
            base.output.format = other.output.format;
        }
        if other.output.path.is_some() {
            base.output.path = other.output.path.clone();
        }
    }

    /// Apply `STATICSOCKET_*` environment variables. Unparseable values are ignored.
    fn apply_env_overrides(config: &mut StaticSocketConfig) {
        if let Ok(val) = std::env::var("STATICSOCKET_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STATICSOCKET_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STATICSOCKET_FAILURE_POLICY") {
            if let Ok(v) = val.parse::<FailurePolicy>() {
                config.analysis.failure_policy = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STATICSOCKET_IMPORT_POLICY") {
            if let Ok(v) = val.parse::<ImportPolicy>() {
                config.analysis.import_policy = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STATICSOCKET_OUTPUT_FORMAT") {
            if let Ok(v) = val.parse::<OutputFormat>() {
                config.output.format = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut StaticSocketConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.failure_policy {
            config.analysis.failure_policy = Some(v);
        }
        if let Some(v) = cli.import_policy {
            config.analysis.import_policy = Some(v);
        }
        if let Some(v) = cli.output_format {
            config.output.format = Some(v);
        }
        if let Some(ref v) = cli.output_path {
            config.output.path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "<root>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
