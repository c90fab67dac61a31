//! Value resolver: recovers an address for records the matcher could not
//! resolve from a literal.
//!
//! Strategies run in a fixed order and the first success wins:
//!
//! 1. constant lookup of a named reference in the unit's top-level bindings
//! 2. idiom classification of a named reference or member access
//! 3. concatenation: constant lookup on the leftmost operand of `a + b`
//! 4. idiom classification of a call used as the address
//!
//! Strategies 2 and 4 are approximate, only apply to egress records, and can
//! be switched off with [`ValueResolver::with_heuristics`].

pub mod idioms;

use tracing::debug;

use crate::address::Endpoint;
use crate::matcher::PreliminaryRecord;
use crate::sockets::SocketRecord;
use crate::syntax::{ArgExpr, CallExpr, Declarations};

pub use idioms::{Confidence, IdiomMatch};

/// Marker appended to a concatenation prefix whose suffix is unknown.
pub const CONTINUATION_MARKER: &str = " + ...";

/// Which strategy settled a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The matcher had already resolved it; nothing was done.
    AlreadyResolved,
    Constant,
    Idiom(Confidence),
    Concatenation,
    CallResult(Confidence),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ValueResolver {
    heuristics: bool,
}

impl Default for ValueResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueResolver {
    pub fn new() -> Self {
        Self { heuristics: true }
    }

    pub fn with_heuristics(mut self, enabled: bool) -> Self {
        self.heuristics = enabled;
        self
    }

    /// Run the strategy chain against the call's address argument.
    ///
    /// A record that is already resolved is left untouched, so calling this
    /// twice is a no-op the second time. When every strategy misses, the
    /// record stays unresolved with the best textual form of the argument
    /// in `raw_value`.
    pub fn resolve(
        &self,
        prelim: &mut PreliminaryRecord,
        call: &CallExpr,
        declarations: &Declarations,
    ) -> Resolution {
        if prelim.is_resolved() {
            return Resolution::AlreadyResolved;
        }
        let Some(arg) = call.arg(prelim.descriptor.address_arg) else {
            return Resolution::Unresolved;
        };
        let is_url = prelim.descriptor.address_is_url;
        let record = &mut prelim.record;

        let resolution = self.run_strategies(record, arg, is_url, declarations);
        if !resolution.is_resolved() && record.raw_value.is_empty() {
            record.raw_value = arg.display_text();
        }

        debug!(
            pattern = %record.pattern_id,
            line = record.source_line,
            ?resolution,
            "resolved address argument"
        );
        resolution
    }

    /// Resolve and hand back the finished record.
    pub fn finalize(
        &self,
        mut prelim: PreliminaryRecord,
        call: &CallExpr,
        declarations: &Declarations,
    ) -> SocketRecord {
        self.resolve(&mut prelim, call, declarations);
        prelim.into_record()
    }

    fn run_strategies(
        &self,
        record: &mut SocketRecord,
        arg: &ArgExpr,
        is_url: bool,
        declarations: &Declarations,
    ) -> Resolution {
        match arg {
            ArgExpr::Name(name) => {
                if let Some(value) = declarations.string_literal(name) {
                    record.raw_value = value.to_string();
                    if record.apply_address(value, is_url) {
                        return Resolution::Constant;
                    }
                }
                self.reference_idiom(record, name)
                    .map_or(Resolution::Unresolved, Resolution::Idiom)
            }
            ArgExpr::Member(path) => self
                .reference_idiom(record, path)
                .map_or(Resolution::Unresolved, Resolution::Idiom),
            ArgExpr::BinaryAdd(left, _) => {
                let Some(prefix) = leftmost_literal(left, declarations) else {
                    return Resolution::Unresolved;
                };
                if record.apply_address(prefix, is_url) {
                    record.raw_value = format!("{prefix}{CONTINUATION_MARKER}");
                    Resolution::Concatenation
                } else {
                    Resolution::Unresolved
                }
            }
            ArgExpr::Call { callee, args } => {
                if !self.heuristics || !record.is_egress() {
                    return Resolution::Unresolved;
                }
                match idioms::classify_call(callee, args) {
                    IdiomMatch::Resolved {
                        host,
                        port,
                        confidence,
                    } => {
                        record.raw_value = arg.display_text();
                        apply_placeholder(record, host, port);
                        Resolution::CallResult(confidence)
                    }
                    IdiomMatch::Unresolved => Resolution::Unresolved,
                }
            }
            ArgExpr::StringLiteral(_) | ArgExpr::Other(_) => Resolution::Unresolved,
        }
    }

    fn reference_idiom(&self, record: &mut SocketRecord, name: &str) -> Option<Confidence> {
        if !self.heuristics || !record.is_egress() {
            return None;
        }
        match idioms::classify_reference(name) {
            IdiomMatch::Resolved {
                host,
                port,
                confidence,
            } => {
                record.raw_value = name.to_string();
                apply_placeholder(record, host, port);
                Some(confidence)
            }
            IdiomMatch::Unresolved => None,
        }
    }
}

/// The literal prefix of a concatenation: the leftmost operand, either a
/// string literal or a name bound to one.
fn leftmost_literal<'a>(expr: &'a ArgExpr, declarations: &'a Declarations) -> Option<&'a str> {
    match expr {
        ArgExpr::BinaryAdd(left, _) => leftmost_literal(left, declarations),
        ArgExpr::StringLiteral(value) => Some(value.as_str()),
        ArgExpr::Name(name) => declarations.string_literal(name),
        _ => None,
    }
}

fn apply_placeholder(record: &mut SocketRecord, host: &str, port: Option<u16>) {
    record.apply_endpoint(Endpoint {
        host: Some(host.to_string()),
        port,
        scheme: None,
    });
}
