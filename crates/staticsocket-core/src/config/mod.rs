//! Configuration system for staticsocket.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod analysis_config;
pub mod output_config;
pub mod scan_config;
pub mod staticsocket_config;

pub use analysis_config::{AnalysisConfig, FailurePolicy, ImportPolicy, PatternConfig};
pub use output_config::{OutputConfig, OutputFormat};
pub use scan_config::ScanConfig;
pub use staticsocket_config::{CliOverrides, StaticSocketConfig};
