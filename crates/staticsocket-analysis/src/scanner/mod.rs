//! Source discovery: which Go files a run analyzes, in which order.

pub mod walker;

pub use walker::{ScanResult, ScanStats, Scanner};
