//! Syntax model consumed by the matcher and resolver.

use std::path::{Path, PathBuf};

use staticsocket_core::types::collections::SmallVec4;
use staticsocket_core::types::FxHashMap;

/// The callee of a call expression, as written at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// `Listen(...)`
    Name(String),
    /// `net.Listen(...)` where the receiver is a plain identifier.
    Selector { receiver: String, member: String },
    /// Anything else: `a.b.c(...)`, `f()(...)`, `(x)(...)`.
    Other(String),
}

impl Callee {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn selector(receiver: impl Into<String>, member: impl Into<String>) -> Self {
        Self::Selector {
            receiver: receiver.into(),
            member: member.into(),
        }
    }

    /// `receiver.member` or the bare identifier; `None` for deeper chains.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::Selector { receiver, member } => Some(format!("{receiver}.{member}")),
            Self::Other(_) => None,
        }
    }

    pub fn receiver(&self) -> Option<&str> {
        match self {
            Self::Selector { receiver, .. } => Some(receiver),
            _ => None,
        }
    }
}

/// An argument expression, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgExpr {
    /// Unquoted value of a string literal.
    StringLiteral(String),
    /// A plain identifier.
    Name(String),
    /// A selector chain such as `server.URL` or `s.config.Database`.
    Member(String),
    /// `left + right`.
    BinaryAdd(Box<ArgExpr>, Box<ArgExpr>),
    /// A nested call: callee text and its own arguments.
    Call { callee: String, args: Vec<ArgExpr> },
    /// Any other expression, kept as source text.
    Other(String),
}

impl ArgExpr {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn member(path: impl Into<String>) -> Self {
        Self::Member(path.into())
    }

    pub fn add(left: ArgExpr, right: ArgExpr) -> Self {
        Self::BinaryAdd(Box::new(left), Box::new(right))
    }

    pub fn call(callee: impl Into<String>) -> Self {
        Self::call_with(callee, Vec::new())
    }

    pub fn call_with(callee: impl Into<String>, args: Vec<ArgExpr>) -> Self {
        Self::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Self::StringLiteral(value) => Some(value),
            _ => None,
        }
    }

    /// Best-effort source-like rendering, used for diagnostics.
    pub fn display_text(&self) -> String {
        match self {
            Self::StringLiteral(value) => format!("{value:?}"),
            Self::Name(text) | Self::Member(text) | Self::Other(text) => text.clone(),
            Self::BinaryAdd(left, right) => {
                format!("{} + {}", left.display_text(), right.display_text())
            }
            Self::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(ArgExpr::display_text).collect();
                format!("{callee}({})", args.join(", "))
            }
        }
    }
}

/// One call expression with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub callee: Callee,
    pub args: SmallVec4<ArgExpr>,
    /// 1-based source line.
    pub line: u32,
    /// Name of the enclosing function or method, if any.
    pub enclosing_function: Option<String>,
}

impl CallExpr {
    pub fn new(callee: Callee, args: impl IntoIterator<Item = ArgExpr>) -> Self {
        Self {
            callee,
            args: args.into_iter().collect(),
            line: 0,
            enclosing_function: None,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn arg(&self, index: usize) -> Option<&ArgExpr> {
        self.args.get(index)
    }
}

/// Initializer of a top-level value binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Literal(String),
    Expression(String),
}

/// Top-level `const`/`var` bindings of one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    bindings: FxHashMap<String, Binding>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    /// Builder-style insert of a string-literal binding.
    pub fn with_literal(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Binding::Literal(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// The literal a name is bound to, when its initializer is a string literal.
    pub fn string_literal(&self, name: &str) -> Option<&str> {
        match self.bindings.get(name)? {
            Binding::Literal(value) => Some(value),
            Binding::Expression(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// One import of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: String,
    /// Name the package is referred to by in this file.
    pub local_name: String,
}

/// Everything the engine needs from one parsed file.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package_name: String,
    pub imports: Vec<ImportSpec>,
    pub declarations: Declarations,
    /// Call expressions in pre-order traversal order.
    pub calls: Vec<CallExpr>,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Package name, or the containing directory's name for entry points.
    pub fn owner_name(&self) -> String {
        if self.package_name == "main" {
            return directory_name(&self.path).unwrap_or_else(|| self.package_name.clone());
        }
        self.package_name.clone()
    }

    /// Whether `name` is the local name of an import in this unit.
    pub fn imports_local_name(&self, name: &str) -> bool {
        self.imports.iter().any(|import| import.local_name == name)
    }
}

fn directory_name(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_shapes() {
        assert_eq!(
            Callee::selector("net", "Dial").qualified_name().as_deref(),
            Some("net.Dial")
        );
        assert_eq!(Callee::name("Dial").qualified_name().as_deref(), Some("Dial"));
        assert_eq!(Callee::Other("a.b.Dial".into()).qualified_name(), None);
    }

    #[test]
    fn test_receiver_only_for_selectors() {
        assert_eq!(Callee::selector("grpc", "Dial").receiver(), Some("grpc"));
        assert_eq!(Callee::name("Dial").receiver(), None);
        assert_eq!(Callee::Other("a.b.Dial".into()).receiver(), None);
    }

    #[test]
    fn test_owner_name_for_main_uses_directory() {
        let mut unit = SourceUnit::new("/src/cmd/gateway/main.go");
        unit.package_name = "main".into();
        assert_eq!(unit.owner_name(), "gateway");

        unit.package_name = "service".into();
        assert_eq!(unit.owner_name(), "service");
    }

    #[test]
    fn test_expression_bindings_are_not_literals() {
        let mut decls = Declarations::new().with_literal("addr", ":8080");
        decls.insert("port", Binding::Expression("os.Getenv(\"PORT\")".into()));
        assert_eq!(decls.string_literal("addr"), Some(":8080"));
        assert_eq!(decls.string_literal("port"), None);
        assert_eq!(decls.string_literal("missing"), None);
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn test_display_text_of_concatenation() {
        let arg = ArgExpr::add(ArgExpr::name("baseURL"), ArgExpr::literal("/users"));
        assert_eq!(arg.display_text(), "baseURL + \"/users\"");
    }
}
