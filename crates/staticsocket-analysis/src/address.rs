//! Address and URL parsers.
//!
//! Pure string-to-struct functions shared by the matcher (for literals) and
//! the resolver (for resolved values). Both call paths go through
//! [`crate::sockets::SocketRecord::apply_address`], so a value parses the
//! same way no matter how it was obtained.

use staticsocket_core::types::Protocol;

/// Interface used when a bind address has no explicit host.
pub const ANY_INTERFACE: &str = "0.0.0.0";

const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";

/// Fields derived from a listening address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindAddress {
    pub interface: Option<String>,
    pub port: Option<u16>,
}

impl BindAddress {
    pub fn is_empty(&self) -> bool {
        self.interface.is_none() && self.port.is_none()
    }
}

/// Fields derived from an outbound address or URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoint {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Set when the value carried an `http://` or `https://` scheme.
    pub scheme: Option<Protocol>,
}

impl Endpoint {
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.port.is_none()
    }
}

/// Parse a listening address: `:8080`, `host:port`, `[v6]:port`, `:`.
///
/// Any other shape, including an unbracketed value with several colons,
/// yields an empty [`BindAddress`].
pub fn parse_bind_address(address: &str) -> BindAddress {
    if let Some(rest) = address.strip_prefix(':') {
        if let Some(port) = parse_port(rest) {
            return BindAddress {
                interface: Some(ANY_INTERFACE.to_string()),
                port: Some(port),
            };
        }
    }

    match split_host_port(address) {
        Some((host, port)) => BindAddress {
            interface: Some(if host.is_empty() {
                ANY_INTERFACE.to_string()
            } else {
                host.to_string()
            }),
            port: parse_port(port),
        },
        None => BindAddress::default(),
    }
}

/// Parse an outbound target: `host:port`, `http://host[:port]/path`,
/// `https://host[:port]/path`, or a bare `host`.
///
/// A scheme supplies the default port (80 or 443) unless one is explicit.
/// Without a scheme and without a `:port`, only the host is set.
pub fn parse_endpoint(target: &str) -> Endpoint {
    let (rest, scheme, default_port) = if let Some(rest) = target.strip_prefix(HTTPS_PREFIX) {
        (rest, Some(Protocol::Https), Some(443))
    } else if let Some(rest) = target.strip_prefix(HTTP_PREFIX) {
        (rest, Some(Protocol::Http), Some(80))
    } else {
        (target, None, None)
    };

    let authority = rest.split('/').next().unwrap_or("");
    if authority.is_empty() {
        return Endpoint {
            scheme,
            ..Default::default()
        };
    }

    match split_host_port(authority) {
        Some((host, port)) => Endpoint {
            host: (!host.is_empty()).then(|| host.to_string()),
            port: parse_port(port),
            scheme,
        },
        None => match bare_host(authority) {
            Some(host) => Endpoint {
                host: Some(host.to_string()),
                port: default_port,
                scheme,
            },
            None => Endpoint {
                scheme,
                ..Default::default()
            },
        },
    }
}

/// Parse a dial address: `host:port`, `[v6]:port`, or a bare host/path.
///
/// No scheme handling; a value without a port yields only the host.
pub fn parse_dial_address(address: &str) -> Endpoint {
    if address.is_empty() {
        return Endpoint::default();
    }
    match split_host_port(address) {
        Some((host, port)) => Endpoint {
            host: (!host.is_empty()).then(|| host.to_string()),
            port: parse_port(port),
            scheme: None,
        },
        None => Endpoint {
            host: bare_host(address).map(str::to_string),
            port: None,
            scheme: None,
        },
    }
}

/// Split `host:port` on the last colon. Bracketed IPv6 hosts keep their
/// inner colons; an unbracketed value with several colons has no port.
fn split_host_port(authority: &str) -> Option<(&str, &str)> {
    if let Some(inner) = authority.strip_prefix('[') {
        let (host, after) = inner.split_once(']')?;
        let port = after.strip_prefix(':')?;
        return Some((host, port));
    }
    let (host, port) = authority.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host, port))
}

/// A host without a port. Unbracketed values may not contain a colon.
fn bare_host(value: &str) -> Option<&str> {
    if value.starts_with('[') {
        return Some(strip_brackets(value));
    }
    (!value.contains(':')).then_some(value)
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

fn parse_port(text: &str) -> Option<u16> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_port() {
        let bind = parse_bind_address(":8080");
        assert_eq!(bind.port, Some(8080));
        assert_eq!(bind.interface.as_deref(), Some("0.0.0.0"));
    }

    #[test]
    fn test_host_and_port() {
        let bind = parse_bind_address("127.0.0.1:9090");
        assert_eq!(bind.interface.as_deref(), Some("127.0.0.1"));
        assert_eq!(bind.port, Some(9090));

        let bind = parse_bind_address("[::1]:443");
        assert_eq!(bind.interface.as_deref(), Some("::1"));
        assert_eq!(bind.port, Some(443));
    }

    #[test]
    fn test_unbracketed_multi_colon_values_yield_nothing() {
        for value in ["::1", "fe80::1", "a:b:c"] {
            assert!(parse_bind_address(value).is_empty(), "{value}");
            assert!(parse_dial_address(value).is_empty(), "{value}");
        }
        let ep = parse_endpoint("https://fe80::1/x");
        assert!(ep.is_empty());
        assert_eq!(ep.scheme, Some(Protocol::Https));

        let ep = parse_dial_address("[fe80::1]");
        assert_eq!(ep.host.as_deref(), Some("fe80::1"));
    }

    #[test]
    fn test_bind_named_port_keeps_interface_only() {
        let bind = parse_bind_address("localhost:http");
        assert_eq!(bind.interface.as_deref(), Some("localhost"));
        assert_eq!(bind.port, None);
    }

    #[test]
    fn test_bind_without_colon_is_empty() {
        assert!(parse_bind_address("/tmp/app.sock").is_empty());
        assert!(parse_bind_address("").is_empty());
    }

    #[test]
    fn test_bind_rejects_signed_and_out_of_range_ports() {
        assert_eq!(parse_bind_address(":+80").port, None);
        assert_eq!(parse_bind_address(":70000").port, None);
    }

    #[test]
    fn test_endpoint_host_port() {
        let ep = parse_endpoint("database.internal:5432");
        assert_eq!(ep.host.as_deref(), Some("database.internal"));
        assert_eq!(ep.port, Some(5432));
        assert_eq!(ep.scheme, None);
    }

    #[test]
    fn test_https_default_port() {
        let ep = parse_endpoint("https://api.example.com/data");
        assert_eq!(ep.host.as_deref(), Some("api.example.com"));
        assert_eq!(ep.port, Some(443));
        assert_eq!(ep.scheme, Some(Protocol::Https));
    }

    #[test]
    fn test_explicit_port_overrides_scheme_default() {
        let ep = parse_endpoint("http://localhost:8080/api");
        assert_eq!(ep.host.as_deref(), Some("localhost"));
        assert_eq!(ep.port, Some(8080));
        assert_eq!(ep.scheme, Some(Protocol::Http));
    }

    #[test]
    fn test_schemeless_host_has_no_port() {
        let ep = parse_endpoint("example.com/path");
        assert_eq!(ep.host.as_deref(), Some("example.com"));
        assert_eq!(ep.port, None);
    }

    #[test]
    fn test_dial_address_forms() {
        let ep = parse_dial_address("cache:6379");
        assert_eq!(ep.host.as_deref(), Some("cache"));
        assert_eq!(ep.port, Some(6379));

        let ep = parse_dial_address(":53");
        assert_eq!(ep.host, None);
        assert_eq!(ep.port, Some(53));

        let ep = parse_dial_address("/var/run/app.sock");
        assert_eq!(ep.host.as_deref(), Some("/var/run/app.sock"));
        assert_eq!(ep.port, None);
    }

    #[test]
    fn test_empty_authority() {
        assert!(parse_endpoint("http:///nothing").is_empty());
        assert!(parse_endpoint("").is_empty());
    }
}
