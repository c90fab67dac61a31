//! Language-neutral view of a parsed source file.
//!
//! The engine never touches tree-sitter nodes directly. A language adapter
//! ([`go::GoSyntaxAdapter`]) lowers one file into a [`SourceUnit`]: its call
//! expressions with arguments classified into the closed [`ArgExpr`] variant,
//! its top-level value bindings, and its imports.

pub mod go;
pub mod types;

pub use go::GoSyntaxAdapter;
pub use types::{ArgExpr, Binding, CallExpr, Callee, Declarations, ImportSpec, SourceUnit};
