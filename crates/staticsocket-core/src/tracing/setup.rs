//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for the staticsocket binaries.
///
/// Reads the `STATICSOCKET_LOG` environment variable for per-module levels,
/// e.g. `STATICSOCKET_LOG=staticsocket_analysis::resolver=trace`.
/// Falls back to `staticsocket=warn`, or `staticsocket=debug` when `verbose`.
///
/// Output goes to stderr so exported results on stdout stay machine-readable.
/// Calling this more than once is a no-op.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "staticsocket=debug"
        } else {
            "staticsocket=warn"
        };
        let filter = EnvFilter::try_from_env("STATICSOCKET_LOG")
            .unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(verbose)
                    .with_line_number(verbose),
            )
            .with(filter)
            .init();
    });
}
