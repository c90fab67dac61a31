//! Scanner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for source file discovery.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum file size in bytes. Default: 10 MiB.
    pub max_file_size: Option<u64>,
    /// Worker threads for per-file analysis. 0 = rayon default.
    pub threads: Option<usize>,
    /// Additional gitignore-style patterns to skip.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Follow symbolic links. Default: false.
    pub follow_symlinks: Option<bool>,
    /// Descend into `vendor/` directories. Default: false.
    pub include_vendor: Option<bool>,
    /// Analyze `_test.go` files. Default: true.
    pub include_tests: Option<bool>,
}

impl ScanConfig {
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(10 * 1024 * 1024)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    pub fn effective_include_vendor(&self) -> bool {
        self.include_vendor.unwrap_or(false)
    }

    pub fn effective_include_tests(&self) -> bool {
        self.include_tests.unwrap_or(true)
    }
}
