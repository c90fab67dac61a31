//! Go adapter using native tree-sitter.
//!
//! Lowers a Go source file into a [`SourceUnit`]: package clause, imports,
//! top-level `const`/`var` bindings and every call expression.

use std::path::Path;
use std::time::Instant;

use staticsocket_core::errors::ParseError;
use tree_sitter::{Node, Parser};

use super::types::{ArgExpr, Binding, CallExpr, Callee, Declarations, ImportSpec, SourceUnit};

/// Go parser. Holds a tree-sitter parser, so one instance per thread.
pub struct GoSyntaxAdapter {
    parser: Parser,
}

impl GoSyntaxAdapter {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError::ParserUnavailable {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse `source` and lower it. Trees with ERROR or MISSING nodes are rejected.
    pub fn parse(&mut self, path: &Path, source: &str) -> Result<SourceUnit, ParseError> {
        let start = Instant::now();

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree {
                path: path.to_path_buf(),
            })?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, message) = first_error(root);
            return Err(ParseError::Malformed {
                path: path.to_path_buf(),
                line,
                message,
            });
        }

        let src = source.as_bytes();
        let mut unit = SourceUnit::new(path);

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = first_named_of_kind(child, "package_identifier") {
                        unit.package_name = text(name, src);
                    }
                }
                "import_declaration" => collect_imports(child, src, &mut unit.imports),
                "const_declaration" | "var_declaration" => {
                    collect_bindings(child, src, &mut unit.declarations)
                }
                _ => {}
            }
        }

        collect_calls(root, src, &mut unit.calls);

        tracing::trace!(
            path = %path.display(),
            calls = unit.calls.len(),
            bindings = unit.declarations.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "parsed go file"
        );
        Ok(unit)
    }
}

fn text(node: Node, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or("").to_string()
}

/// Node text with all whitespace removed (selector chains may span lines).
fn compact_text(node: Node, src: &[u8]) -> String {
    node.utf8_text(src)
        .unwrap_or("")
        .split_whitespace()
        .collect()
}

fn first_named_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Pre-order search for the first ERROR or MISSING node.
fn first_error(root: Node) -> (u32, String) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() {
            return (node.start_position().row as u32 + 1, "syntax error".to_string());
        }
        if node.is_missing() {
            return (
                node.start_position().row as u32 + 1,
                format!("missing {}", node.kind()),
            );
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    (root.start_position().row as u32 + 1, "syntax error".to_string())
}

fn collect_imports(decl: Node, src: &[u8], imports: &mut Vec<ImportSpec>) {
    let mut stack = vec![decl];
    while let Some(node) = stack.pop() {
        if node.kind() == "import_spec" {
            let Some(path_node) = node.child_by_field_name("path") else {
                continue;
            };
            let path = string_literal_value(path_node, src).unwrap_or_default();
            if path.is_empty() {
                continue;
            }
            let local_name = match node.child_by_field_name("name") {
                Some(alias) => text(alias, src),
                None => default_package_name(&path),
            };
            imports.push(ImportSpec { path, local_name });
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

/// Package name implied by an import path: last segment, skipping a `/vN`
/// major-version suffix and a `.vN` gopkg.in suffix.
fn default_package_name(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(prev) = segments.next() {
            last = prev;
        }
    }
    match last.rsplit_once('.') {
        Some((name, suffix)) if is_major_version(suffix) => name.to_string(),
        _ => last.to_string(),
    }
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

fn collect_bindings(decl: Node, src: &[u8], declarations: &mut Declarations) {
    let mut stack = vec![decl];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "const_spec" | "var_spec" => bind_spec(node, src, declarations),
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }
}

fn bind_spec(spec: Node, src: &[u8], declarations: &mut Declarations) {
    let mut cursor = spec.walk();
    let names: Vec<Node> = spec
        .children_by_field_name("name", &mut cursor)
        .filter(|n| n.kind() == "identifier")
        .collect();

    let Some(value_list) = spec.child_by_field_name("value") else {
        return;
    };
    let mut value_cursor = value_list.walk();
    let values: Vec<Node> = value_list
        .named_children(&mut value_cursor)
        .filter(|n| n.kind() != "comment")
        .collect();

    for (name, value) in names.into_iter().zip(values) {
        let binding = match string_literal_value(unwrap_parens(value), src) {
            Some(literal) => Binding::Literal(literal),
            None => Binding::Expression(text(value, src)),
        };
        declarations.insert(text(name, src), binding);
    }
}

/// Iterative pre-order walk so outer calls precede calls nested in their arguments.
fn collect_calls(root: Node, src: &[u8], calls: &mut Vec<CallExpr>) {
    let mut stack: Vec<(Node, Option<String>)> = vec![(root, None)];

    while let Some((node, enclosing)) = stack.pop() {
        let enclosing = match node.kind() {
            "function_declaration" | "method_declaration" => node
                .child_by_field_name("name")
                .map(|n| text(n, src))
                .or(enclosing),
            _ => enclosing,
        };

        if node.kind() == "call_expression" {
            if let Some(call) = lower_call(node, src, enclosing.clone()) {
                calls.push(call);
            }
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push((child, enclosing.clone()));
        }
    }
}

fn lower_call(node: Node, src: &[u8], enclosing: Option<String>) -> Option<CallExpr> {
    let function = node.child_by_field_name("function")?;
    let callee = lower_callee(function, src);

    Some(CallExpr {
        callee,
        args: lower_args(node, src).into_iter().collect(),
        line: node.start_position().row as u32 + 1,
        enclosing_function: enclosing,
    })
}

fn lower_args(call: Node, src: &[u8]) -> Vec<ArgExpr> {
    let Some(list) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = list.walk();
    let args: Vec<ArgExpr> = list
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| lower_expr(n, src))
        .collect();
    args
}

fn lower_callee(function: Node, src: &[u8]) -> Callee {
    match function.kind() {
        "identifier" => Callee::Name(text(function, src)),
        "selector_expression" => {
            let operand = function.child_by_field_name("operand");
            let field = function.child_by_field_name("field");
            match (operand, field) {
                (Some(operand), Some(field)) if operand.kind() == "identifier" => {
                    Callee::Selector {
                        receiver: text(operand, src),
                        member: text(field, src),
                    }
                }
                _ => Callee::Other(compact_text(function, src)),
            }
        }
        _ => Callee::Other(compact_text(function, src)),
    }
}

fn lower_expr(node: Node, src: &[u8]) -> ArgExpr {
    let node = unwrap_parens(node);
    match node.kind() {
        "interpreted_string_literal" | "raw_string_literal" => {
            match string_literal_value(node, src) {
                Some(value) => ArgExpr::StringLiteral(value),
                None => ArgExpr::Other(text(node, src)),
            }
        }
        "identifier" => ArgExpr::Name(text(node, src)),
        "selector_expression" => ArgExpr::Member(compact_text(node, src)),
        "binary_expression" => {
            let is_add = node
                .child_by_field_name("operator")
                .is_some_and(|op| op.kind() == "+");
            match (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                (Some(left), Some(right)) if is_add => {
                    ArgExpr::add(lower_expr(left, src), lower_expr(right, src))
                }
                _ => ArgExpr::Other(text(node, src)),
            }
        }
        "call_expression" => match node.child_by_field_name("function") {
            Some(function) => ArgExpr::Call {
                callee: compact_text(function, src),
                args: lower_args(node, src),
            },
            None => ArgExpr::Other(text(node, src)),
        },
        _ => ArgExpr::Other(text(node, src)),
    }
}

fn unwrap_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment");
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Value of a Go string literal node, or `None` if `node` is not one.
fn string_literal_value(node: Node, src: &[u8]) -> Option<String> {
    let raw = node.utf8_text(src).ok()?;
    match node.kind() {
        "raw_string_literal" => Some(
            raw.strip_prefix('`')?
                .strip_suffix('`')?
                .replace('\r', ""),
        ),
        "interpreted_string_literal" => {
            let body = raw.strip_prefix('"')?.strip_suffix('"')?;
            Some(unescape(body))
        }
        _ => None,
    }
}

/// Decode Go escape sequences in an interpreted string body.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(kind);
                        out.push_str(&digits);
                    }
                }
            }
            Some(first @ '0'..='7') => {
                let rest: String = chars.by_ref().take(2).collect();
                let digits = format!("{first}{rest}");
                match u8::from_str_radix(&digits, 8) {
                    Ok(byte) if digits.len() == 3 => out.push(char::from(byte)),
                    _ => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
