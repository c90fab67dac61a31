//! Call-site matcher: one call expression -> optional preliminary record.

use crate::catalog::{PatternCatalog, PatternDescriptor};
use crate::sockets::SocketRecord;
use crate::syntax::{CallExpr, SourceUnit};

/// A record fresh from the matcher, still carrying the descriptor the
/// resolver needs to find and parse the address argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreliminaryRecord {
    pub record: SocketRecord,
    pub descriptor: PatternDescriptor,
}

impl PreliminaryRecord {
    pub fn is_resolved(&self) -> bool {
        self.record.resolved
    }

    /// Fill in file-level provenance from the unit the call came from.
    pub fn with_provenance(mut self, unit: &SourceUnit) -> Self {
        self.record.source_file = unit.path.clone();
        self.record.owner_name = unit.owner_name();
        self
    }

    pub fn into_record(self) -> SocketRecord {
        self.record
    }
}

/// Match one call against the catalog.
///
/// Returns `None` (a normal outcome) when the callee has no qualified name,
/// has no catalog entry, or supplies too few arguments. A string-literal
/// address is parsed on the spot.
pub fn match_call_site(call: &CallExpr, catalog: &PatternCatalog) -> Option<PreliminaryRecord> {
    let name = call.callee.qualified_name()?;
    let descriptor = *catalog.lookup(&name)?;
    let arg = call.arg(descriptor.address_arg)?;

    let mut record = SocketRecord::new(name, &descriptor);
    record.source_line = call.line;
    record.function_name = call.enclosing_function.clone();

    if let Some(literal) = arg.as_string_literal() {
        record.raw_value = literal.to_string();
        if !literal.is_empty() {
            record.apply_address(literal, descriptor.address_is_url);
        }
    }

    tracing::debug!(
        pattern = %record.pattern_id,
        line = call.line,
        resolved = record.resolved,
        "matched socket call"
    );

    Some(PreliminaryRecord { record, descriptor })
}

#[cfg(test)]
mod tests {
    use staticsocket_core::types::{Direction, Protocol};

    use super::*;
    use crate::syntax::{ArgExpr, Callee};

    fn catalog() -> PatternCatalog {
        PatternCatalog::go_default()
    }

    #[test]
    fn test_literal_listen_address() {
        let call = CallExpr::new(
            Callee::selector("http", "ListenAndServe"),
            [ArgExpr::literal(":8080"), ArgExpr::name("nil")],
        )
        .at_line(12);
        let prelim = match_call_site(&call, &catalog()).unwrap();
        let record = prelim.record;
        assert_eq!(record.direction, Direction::Ingress);
        assert_eq!(record.protocol, Protocol::Http);
        assert_eq!(record.pattern_id, "http.ListenAndServe");
        assert_eq!(record.raw_value, ":8080");
        assert!(record.resolved);
        assert_eq!(record.listen_port, Some(8080));
        assert_eq!(record.listen_interface.as_deref(), Some("0.0.0.0"));
        assert_eq!(record.source_line, 12);
    }

    #[test]
    fn test_unknown_callee_is_no_match() {
        let call = CallExpr::new(Callee::selector("fmt", "Println"), [ArgExpr::literal("hi")]);
        assert!(match_call_site(&call, &catalog()).is_none());
    }

    #[test]
    fn test_deep_selector_is_no_match() {
        let call = CallExpr::new(
            Callee::Other("a.net.Dial".into()),
            [ArgExpr::literal("tcp"), ArgExpr::literal("db:1")],
        );
        assert!(match_call_site(&call, &catalog()).is_none());
    }

    #[test]
    fn test_too_few_arguments_is_no_match() {
        let call = CallExpr::new(Callee::selector("net", "Dial"), [ArgExpr::literal("tcp")]);
        assert!(match_call_site(&call, &catalog()).is_none());
    }

    #[test]
    fn test_non_literal_argument_stays_unresolved() {
        let call = CallExpr::new(
            Callee::selector("net", "Dial"),
            [ArgExpr::literal("tcp"), ArgExpr::name("addr")],
        );
        let prelim = match_call_site(&call, &catalog()).unwrap();
        assert!(!prelim.is_resolved());
        assert!(prelim.record.raw_value.is_empty());
        assert!(!prelim.record.has_structured_fields());
    }

    #[test]
    fn test_empty_literal_is_not_parsed() {
        let call = CallExpr::new(Callee::selector("http", "Get"), [ArgExpr::literal("")]);
        let prelim = match_call_site(&call, &catalog()).unwrap();
        assert!(!prelim.is_resolved());
    }

    #[test]
    fn test_provenance_from_unit() {
        let mut unit = SourceUnit::new("cmd/api/main.go");
        unit.package_name = "main".into();
        let call = CallExpr::new(
            Callee::selector("net", "Dial"),
            [ArgExpr::literal("tcp"), ArgExpr::literal("db:5432")],
        );
        let record = match_call_site(&call, &catalog())
            .unwrap()
            .with_provenance(&unit)
            .into_record();
        assert_eq!(record.owner_name, "api");
        assert_eq!(record.source_file, std::path::PathBuf::from("cmd/api/main.go"));
    }
}
