//! Name-based idiom classification.
//!
//! Everything approximate about value resolution lives here. The strategy
//! chain only sees an [`IdiomMatch`], so these tables can be tightened
//! without touching it.

use crate::syntax::ArgExpr;

/// Placeholder host for a local test server.
pub const LOCALHOST: &str = "localhost";
/// Placeholder host for an endpoint supplied from outside the program.
pub const EXTERNAL_SERVICE: &str = "external-service";
/// Placeholder host for a `url.URL` rendered back to a string.
pub const PARSED_URL_HOST: &str = "parsed-url-host";
/// Placeholder host for a function that computes a URL.
pub const DYNAMIC_URL: &str = "dynamic-url";

const ENV_ACCESSORS: &[&str] = &["os.Getenv", "os.LookupEnv"];
const ENV_ENDPOINT_MARKERS: &[&str] = &["URL", "HOST", "ADDR", "ENDPOINT"];
const TEST_SERVER_RECEIVERS: &[&str] = &["server", "srv", "ts", "testServer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdiomMatch {
    Unresolved,
    Resolved {
        host: &'static str,
        port: Option<u16>,
        confidence: Confidence,
    },
}

impl IdiomMatch {
    fn host(host: &'static str, confidence: Confidence) -> Self {
        Self::Resolved {
            host,
            port: None,
            confidence,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Classify a named reference or member access (`apiURL`, `server.URL`).
pub fn classify_reference(name: &str) -> IdiomMatch {
    if is_test_server_url(name) {
        return IdiomMatch::host(LOCALHOST, Confidence::Medium);
    }
    if name.contains("localhost") || name.contains("127.0.0.1") {
        return IdiomMatch::host(LOCALHOST, Confidence::Low);
    }
    let lower = name.to_ascii_lowercase();
    if lower.contains("url") && (lower.contains("api") || lower.contains("service")) {
        return IdiomMatch::host(EXTERNAL_SERVICE, Confidence::Low);
    }
    IdiomMatch::Unresolved
}

/// Classify a call used as an address (`u.String()`, `getServiceURL()`,
/// `os.Getenv("API_URL")`).
pub fn classify_call(callee: &str, args: &[ArgExpr]) -> IdiomMatch {
    if ENV_ACCESSORS.contains(&callee) {
        let names_endpoint = args
            .first()
            .and_then(ArgExpr::as_string_literal)
            .is_some_and(|key| ENV_ENDPOINT_MARKERS.iter().any(|m| key.contains(m)));
        return if names_endpoint {
            IdiomMatch::host(EXTERNAL_SERVICE, Confidence::Low)
        } else {
            IdiomMatch::Unresolved
        };
    }

    if callee.ends_with("String") && callee.to_ascii_lowercase().contains("url") {
        return IdiomMatch::host(PARSED_URL_HOST, Confidence::Low);
    }

    let last = callee.rsplit('.').next().unwrap_or(callee).to_ascii_lowercase();
    if last.starts_with("get") && last.ends_with("url") {
        return IdiomMatch::host(DYNAMIC_URL, Confidence::Low);
    }
    IdiomMatch::Unresolved
}

fn is_test_server_url(name: &str) -> bool {
    if name.contains("httptest") {
        return true;
    }
    match name.rsplit_once('.') {
        Some((receiver, "URL")) => {
            let receiver = receiver.rsplit('.').next().unwrap_or(receiver);
            TEST_SERVER_RECEIVERS.contains(&receiver)
        }
        _ => false,
    }
}
