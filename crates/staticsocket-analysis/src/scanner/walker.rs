//! Go file walker built on the `ignore` crate.
//!
//! Respects `.gitignore`, skips hidden entries and `vendor/` directories,
//! applies the configured extra ignore globs, and returns paths sorted so
//! that record order is stable across runs.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use staticsocket_core::config::ScanConfig;
use staticsocket_core::errors::ScanError;
use tracing::{debug, trace};

const GO_EXTENSION: &str = "go";
const TEST_SUFFIX: &str = "_test.go";
const VENDOR_DIR: &str = "vendor";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_found: usize,
    pub skipped_oversize: usize,
    pub skipped_tests: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Sorted paths of the Go files to analyze.
    pub files: Vec<PathBuf>,
    pub stats: ScanStats,
}

pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Discover Go files under `root`. A file root is returned as-is,
    /// whatever its extension.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if root.is_file() {
            return Ok(ScanResult {
                root: root.to_path_buf(),
                files: vec![root.to_path_buf()],
                stats: ScanStats {
                    files_found: 1,
                    ..ScanStats::default()
                },
            });
        }
        if !root.is_dir() {
            return Err(ScanError::NotFound {
                path: root.to_path_buf(),
            });
        }

        let include_vendor = self.config.effective_include_vendor();
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .require_git(false)
            .follow_links(self.config.effective_follow_symlinks())
            .overrides(self.overrides(root)?)
            .filter_entry(move |entry| {
                include_vendor
                    || !(entry.file_type().is_some_and(|t| t.is_dir())
                        && entry.file_name() == VENDOR_DIR)
            });

        let mut stats = ScanStats::default();
        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|e| ScanError::Walk {
                root: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(GO_EXTENSION) {
                continue;
            }
            if !self.config.effective_include_tests() && is_test_file(path) {
                stats.skipped_tests += 1;
                continue;
            }
            let size = fs::metadata(path)
                .map_err(|source| ScanError::IoError {
                    path: path.to_path_buf(),
                    source,
                })?
                .len();
            if size > self.config.effective_max_file_size() {
                trace!(path = %path.display(), size, "skipping oversize file");
                stats.skipped_oversize += 1;
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        stats.files_found = files.len();
        debug!(
            root = %root.display(),
            files = stats.files_found,
            skipped_oversize = stats.skipped_oversize,
            skipped_tests = stats.skipped_tests,
            "scan complete"
        );
        Ok(ScanResult {
            root: root.to_path_buf(),
            files,
            stats,
        })
    }

    /// Extra ignore patterns become negated override globs.
    fn overrides(&self, root: &Path) -> Result<Override, ScanError> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.config.extra_ignore {
            let glob = format!("!{}", pattern.trim_start_matches('!'));
            builder.add(&glob).map_err(|e| ScanError::InvalidIgnore {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }
        builder.build().map_err(|e| ScanError::InvalidIgnore {
            pattern: self.config.extra_ignore.join(","),
            message: e.to_string(),
        })
    }
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEST_SUFFIX))
}
