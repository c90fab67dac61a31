//! staticsocket-core: shared vocabulary for the staticsocket analyzer.
//!
//! - Types: traffic direction, protocol, collection aliases
//! - Errors: one `thiserror` enum per subsystem, each with a stable error code
//! - Config: TOML configuration with layered resolution
//! - Tracing: `tracing-subscriber` setup driven by `STATICSOCKET_LOG`
//! - Traits: cooperative cancellation

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::StaticSocketConfig;
pub use traits::{Cancellable, CancellationToken};
pub use types::{Direction, Protocol};
