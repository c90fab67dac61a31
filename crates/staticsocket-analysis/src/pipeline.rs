//! Multi-file analysis: scan, parse and analyze in parallel, merge in order.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use staticsocket_core::config::{FailurePolicy, ImportPolicy, ScanConfig, StaticSocketConfig};
use staticsocket_core::errors::{ParseError, PipelineError, PipelineResult};
use staticsocket_core::traits::{Cancellable, CancellationToken};
use tracing::{debug, info, warn};

use crate::catalog::PatternCatalog;
use crate::matcher::match_call_site;
use crate::resolver::ValueResolver;
use crate::scanner::Scanner;
use crate::sockets::{AnalysisResult, SocketRecord};
use crate::syntax::{CallExpr, GoSyntaxAdapter, SourceUnit};

/// Outcome of one file; `None` when it was never started.
type FileOutcome = Option<Result<Vec<SocketRecord>, ParseError>>;

thread_local! {
    static ADAPTER: RefCell<Option<GoSyntaxAdapter>> = const { RefCell::new(None) };
}

/// Drives the matcher and resolver over whole files and directories.
///
/// Holds only read-only state, so one analyzer is shared by every worker.
#[derive(Clone)]
pub struct SocketAnalyzer {
    catalog: Arc<PatternCatalog>,
    resolver: ValueResolver,
    scan: ScanConfig,
    failure_policy: FailurePolicy,
    import_policy: ImportPolicy,
}

impl SocketAnalyzer {
    pub fn new(catalog: PatternCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            resolver: ValueResolver::new(),
            scan: ScanConfig::default(),
            failure_policy: FailurePolicy::default(),
            import_policy: ImportPolicy::default(),
        }
    }

    /// Default Go catalog extended with `[[analysis.patterns]]`, plus the
    /// configured policies.
    pub fn from_config(config: &StaticSocketConfig) -> Result<Self, PipelineError> {
        let catalog = PatternCatalog::go_default_with(&config.analysis.patterns)?;
        Ok(Self::new(catalog)
            .with_resolver(
                ValueResolver::new().with_heuristics(config.analysis.effective_heuristics()),
            )
            .with_scan_config(config.scan.clone())
            .with_failure_policy(config.analysis.effective_failure_policy())
            .with_import_policy(config.analysis.effective_import_policy()))
    }

    pub fn with_resolver(mut self, resolver: ValueResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Match and resolve every call in one unit, in call order.
    pub fn analyze_unit(&self, unit: &SourceUnit) -> Vec<SocketRecord> {
        unit.calls
            .iter()
            .filter(|call| self.passes_import_policy(call, unit))
            .filter_map(|call| {
                let prelim = match_call_site(call, &self.catalog)?.with_provenance(unit);
                Some(self.resolver.finalize(prelim, call, &unit.declarations))
            })
            .collect()
    }

    /// Parse and analyze one in-memory file.
    pub fn analyze_source(
        &self,
        path: &Path,
        source: &str,
    ) -> Result<Vec<SocketRecord>, ParseError> {
        let unit = ADAPTER.with(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_none() {
                *slot = Some(GoSyntaxAdapter::new()?);
            }
            match slot.as_mut() {
                Some(adapter) => adapter.parse(path, source),
                None => Err(ParseError::NoTree {
                    path: path.to_path_buf(),
                }),
            }
        })?;
        Ok(self.analyze_unit(&unit))
    }

    pub fn analyze_file(&self, path: &Path) -> Result<Vec<SocketRecord>, ParseError> {
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.analyze_source(path, &source)
    }

    /// Analyze every Go file under `root` (or `root` itself if it is a file).
    ///
    /// Files are analyzed in parallel and merged by this thread in scan
    /// order. Under [`FailurePolicy::FailFast`] the first failing file in
    /// that order aborts the run; under [`FailurePolicy::SkipAndReport`] it
    /// is logged and returned in [`PipelineResult::errors`]. Cancellation
    /// discards all work and returns [`PipelineError::Cancelled`].
    pub fn analyze_path(
        &self,
        root: &Path,
        token: &CancellationToken,
    ) -> Result<PipelineResult<AnalysisResult>, PipelineError> {
        let start = Instant::now();
        let scan = Scanner::new(self.scan.clone()).scan(root)?;
        debug!(files = scan.files.len(), "analyzing scanned files");

        let outcomes = self.run_parallel(&scan.files, token);
        if token.is_cancelled() {
            info!(root = %root.display(), "analysis cancelled");
            return Err(PipelineError::Cancelled);
        }

        let mut result = PipelineResult::new(AnalysisResult::new());
        for (path, outcome) in scan.files.iter().zip(outcomes) {
            match outcome {
                Some(Ok(records)) => result.data.merge_file(records),
                Some(Err(e)) => match self.failure_policy {
                    FailurePolicy::FailFast => return Err(e.into()),
                    FailurePolicy::SkipAndReport => {
                        let failed = e.path().unwrap_or(path);
                        warn!(path = %failed.display(), error = %e, "skipping file");
                        result.add_error(e.into());
                    }
                },
                None => return Err(PipelineError::Cancelled),
            }
        }

        info!(
            root = %root.display(),
            files = scan.files.len(),
            sockets = result.data.total_count(),
            ingress = result.data.ingress_count(),
            egress = result.data.egress_count(),
            resolved = result.data.resolved_count(),
            skipped = result.error_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "analysis complete"
        );
        Ok(result)
    }

    /// Per-file outcomes in the order of `files`.
    fn run_parallel(&self, files: &[PathBuf], token: &CancellationToken) -> Vec<FileOutcome> {
        let work = || -> Vec<FileOutcome> {
            files
                .par_iter()
                .map(|path| {
                    if token.is_cancelled() {
                        return None;
                    }
                    Some(self.analyze_file(path))
                })
                .collect()
        };

        let threads = self.scan.effective_threads();
        if threads == 0 {
            return work();
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(work),
            Err(e) => {
                warn!(threads, error = %e, "falling back to the global thread pool");
                work()
            }
        }
    }

    fn passes_import_policy(&self, call: &CallExpr, unit: &SourceUnit) -> bool {
        match (&self.import_policy, call.callee.receiver()) {
            (ImportPolicy::RequireImport, Some(receiver)) => unit.imports_local_name(receiver),
            _ => true,
        }
    }
}

impl Default for SocketAnalyzer {
    fn default() -> Self {
        Self::new(PatternCatalog::go_default())
    }
}

#[cfg(test)]
mod tests {
    use staticsocket_core::types::Direction;

    use super::*;

    const SHADOWED: &str = r#"package main

import "net"

type client struct{}

func (client) Get(u string) {}

func main() {
	http := client{}
	http.Get("http://not-a-real-call")
	net.Dial("tcp", "db:5432")
}
"#;

    #[test]
    fn test_analyze_source_records_in_call_order() {
        let source = r#"package main

import (
	"net"
	"net/http"
)

func main() {
	go http.ListenAndServe(":8080", nil)
	net.Dial("tcp", "cache:6379")
}
"#;
        let records = SocketAnalyzer::default()
            .analyze_source(Path::new("svc/main.go"), source)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].direction, Direction::Ingress);
        assert_eq!(records[0].source_line, 9);
        assert_eq!(records[0].owner_name, "svc");
        assert_eq!(records[0].function_name.as_deref(), Some("main"));
        assert_eq!(records[1].destination_host.as_deref(), Some("cache"));
    }

    #[test]
    fn test_lexical_policy_reports_shadowed_receiver() {
        let records = SocketAnalyzer::default()
            .analyze_source(Path::new("main.go"), SHADOWED)
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_require_import_drops_shadowed_receiver() {
        let records = SocketAnalyzer::default()
            .with_import_policy(ImportPolicy::RequireImport)
            .analyze_source(Path::new("main.go"), SHADOWED)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pattern_id, "net.Dial");
    }

    #[test]
    fn test_malformed_source_is_an_error() {
        let err = SocketAnalyzer::default()
            .analyze_source(Path::new("broken.go"), "package main\nfunc main( {\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }
}
