use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use staticsocket_analysis::export;
use staticsocket_analysis::SocketAnalyzer;
use staticsocket_core::config::{CliOverrides, FailurePolicy, ImportPolicy, OutputFormat};
use staticsocket_core::errors::StaticSocketErrorCode;
use staticsocket_core::tracing::init_tracing;
use staticsocket_core::{CancellationToken, StaticSocketConfig};

/// Find the sockets a Go codebase opens, without running it.
#[derive(Parser)]
#[command(name = "staticsocket")]
#[command(about = "Static detection of listening and outbound sockets in Go source")]
#[command(version)]
struct Cli {
    /// File or directory to analyze
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format: json, yaml or csv
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Configuration file, replacing the project's staticsocket.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip files that fail to parse instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Only match `pkg.Func` calls whose receiver is an imported package
    #[arg(long)]
    require_imports: bool,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_file: self.config.clone(),
            scan_threads: self.threads,
            failure_policy: self.keep_going.then_some(FailurePolicy::SkipAndReport),
            import_policy: self.require_imports.then_some(ImportPolicy::RequireImport),
            output_format: self.format,
            output_path: self.output.clone(),
            ..CliOverrides::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = StaticSocketConfig::load(&cli.path, Some(&cli.overrides()))
        .context("failed to load configuration")?;
    let analyzer = SocketAnalyzer::from_config(&config)?;

    let outcome = analyzer
        .analyze_path(&cli.path, &CancellationToken::new())
        .map_err(|e| anyhow::anyhow!(e.coded_string()))?;
    for error in &outcome.errors {
        eprintln!("warning: {}", error.coded_string());
    }

    let format = config.output.effective_format();
    match &config.output.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            export::export(&outcome.data, format, &mut BufWriter::new(file))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            export::export(&outcome.data, format, &mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
