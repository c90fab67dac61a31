//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for call arguments (Go networking calls take at most 3).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
