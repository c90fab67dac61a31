//! Result model: one [`SocketRecord`] per detected call site, accumulated
//! into an [`AnalysisResult`].

pub mod record;
pub mod result;

pub use record::SocketRecord;
pub use result::AnalysisResult;
