//! Shared data types.

pub mod collections;
pub mod traffic;

pub use collections::{FxHashMap, FxHashSet};
pub use traffic::{Direction, Protocol};
