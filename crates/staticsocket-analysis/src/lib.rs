//! staticsocket-analysis: finds socket-creating call sites in Go source.
//!
//! Data flow: syntax tree -> [`matcher`] (using the [`catalog`]) -> preliminary
//! record -> [`resolver`] (using the [`address`] parsers) -> finalized record ->
//! [`sockets::AnalysisResult`].
//!
//! The [`syntax`] adapter, [`scanner`], [`pipeline`] and [`export`] modules are
//! thin layers around the two engine entry points, [`matcher::match_call_site`]
//! and [`resolver::ValueResolver::resolve`].

pub mod address;
pub mod catalog;
pub mod export;
pub mod matcher;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
pub mod sockets;
pub mod syntax;

pub use catalog::{PatternCatalog, PatternDescriptor};
pub use matcher::{match_call_site, PreliminaryRecord};
pub use pipeline::SocketAnalyzer;
pub use resolver::ValueResolver;
pub use sockets::{AnalysisResult, SocketRecord};
