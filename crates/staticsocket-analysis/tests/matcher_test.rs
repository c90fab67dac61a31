//! Call-site matcher against the full default catalog.

use staticsocket_analysis::catalog::PatternCatalog;
use staticsocket_analysis::match_call_site;
use staticsocket_analysis::resolver::ValueResolver;
use staticsocket_analysis::syntax::{ArgExpr, CallExpr, Callee, Declarations};
use staticsocket_core::types::{Direction, Protocol};

/// A call to `name` with filler arguments and `address` at `index`.
fn call_with_address(name: &str, index: usize, address: ArgExpr) -> CallExpr {
    let callee = match name.split_once('.') {
        Some((receiver, member)) => Callee::selector(receiver, member),
        None => Callee::name(name),
    };
    let mut args: Vec<ArgExpr> = (0..index).map(|_| ArgExpr::name("nil")).collect();
    args.push(address);
    CallExpr::new(callee, args).at_line(3)
}

fn sample_address(direction: Direction, is_url: bool) -> &'static str {
    match (direction, is_url) {
        (Direction::Ingress, _) => "127.0.0.1:9000",
        (Direction::Egress, true) => "http://svc.internal:9000/v1",
        (Direction::Egress, false) => "svc.internal:9000",
    }
}

#[test]
fn test_every_catalog_entry_matches_its_literal() {
    let catalog = PatternCatalog::go_default();
    assert!(!catalog.is_empty());

    for (name, descriptor) in catalog.iter() {
        let literal = sample_address(descriptor.direction, descriptor.address_is_url);
        let call = call_with_address(name, descriptor.address_arg, ArgExpr::literal(literal));

        let prelim = match_call_site(&call, &catalog)
            .unwrap_or_else(|| panic!("{name} did not match"));
        let record = prelim.record;
        assert_eq!(record.pattern_id, name);
        assert_eq!(record.direction, descriptor.direction, "{name}");
        assert_eq!(record.raw_value, literal, "{name}");
        assert!(record.resolved, "{name}");
        assert!(record.is_consistent(), "{name}");
        match descriptor.direction {
            Direction::Ingress => {
                assert_eq!(record.protocol, descriptor.protocol, "{name}");
                assert_eq!(record.listen_port, Some(9000), "{name}");
                assert_eq!(record.listen_interface.as_deref(), Some("127.0.0.1"), "{name}");
            }
            Direction::Egress => {
                assert_eq!(record.destination_host.as_deref(), Some("svc.internal"), "{name}");
                assert_eq!(record.destination_port, Some(9000), "{name}");
            }
        }
    }
}

#[test]
fn test_every_catalog_entry_needs_its_address_argument() {
    let catalog = PatternCatalog::go_default();
    for (name, descriptor) in catalog.iter() {
        let mut call = call_with_address(name, descriptor.address_arg, ArgExpr::literal("x:1"));
        call.args.pop();
        assert!(match_call_site(&call, &catalog).is_none(), "{name}");
    }
}

#[test]
fn test_bare_port_binds_all_interfaces() {
    let catalog = PatternCatalog::go_default();
    let call = call_with_address("net.Listen", 1, ArgExpr::literal(":8080"));
    let record = match_call_site(&call, &catalog).unwrap().record;
    assert_eq!(record.listen_port, Some(8080));
    assert_eq!(record.listen_interface.as_deref(), Some("0.0.0.0"));
    assert_eq!(record.destination_host, None);
}

#[test]
fn test_dial_host_and_port() {
    let catalog = PatternCatalog::go_default();
    let call = call_with_address("net.Dial", 1, ArgExpr::literal("database.internal:5432"));
    let record = match_call_site(&call, &catalog).unwrap().record;
    assert_eq!(record.protocol, Protocol::Tcp);
    assert_eq!(record.destination_host.as_deref(), Some("database.internal"));
    assert_eq!(record.destination_port, Some(5432));
}

#[test]
fn test_https_url_promotes_protocol_with_default_port() {
    let catalog = PatternCatalog::go_default();
    let call = call_with_address("http.Get", 0, ArgExpr::literal("https://api.example.com/data"));
    let record = match_call_site(&call, &catalog).unwrap().record;
    assert_eq!(record.protocol, Protocol::Https);
    assert_eq!(record.destination_host.as_deref(), Some("api.example.com"));
    assert_eq!(record.destination_port, Some(443));
}

#[test]
fn test_explicit_port_overrides_scheme_default() {
    let catalog = PatternCatalog::go_default();
    let call = call_with_address("http.Post", 0, ArgExpr::literal("http://localhost:8080/api"));
    let record = match_call_site(&call, &catalog).unwrap().record;
    assert_eq!(record.protocol, Protocol::Http);
    assert_eq!(record.destination_host.as_deref(), Some("localhost"));
    assert_eq!(record.destination_port, Some(8080));
}

#[test]
fn test_unrelated_calls_yield_nothing() {
    let catalog = PatternCatalog::go_default();
    let calls = [
        CallExpr::new(Callee::selector("fmt", "Printf"), [ArgExpr::literal(":8080")]),
        CallExpr::new(Callee::name("Dial"), [ArgExpr::literal("tcp"), ArgExpr::literal("a:1")]),
        CallExpr::new(Callee::selector("Net", "Dial"), [ArgExpr::literal("tcp"), ArgExpr::literal("a:1")]),
        CallExpr::new(Callee::Other("s.client.Get".into()), [ArgExpr::literal("http://a")]),
    ];
    for call in &calls {
        assert!(match_call_site(call, &catalog).is_none(), "{call:?}");
    }
}

#[test]
fn test_resolver_is_idempotent_on_literal_records() {
    let catalog = PatternCatalog::go_default();
    let call = call_with_address("http.Get", 0, ArgExpr::literal("https://api.example.com/data"));
    let mut prelim = match_call_site(&call, &catalog).unwrap();
    let before = prelim.clone();

    let resolver = ValueResolver::new();
    let decls = Declarations::new();
    resolver.resolve(&mut prelim, &call, &decls);
    resolver.resolve(&mut prelim, &call, &decls);
    assert_eq!(prelim, before);
}

#[test]
fn test_unbracketed_ipv6_literals_stay_unresolved() {
    let catalog = PatternCatalog::go_default();
    for (name, index, literal) in [("net.Listen", 1, "::1"), ("net.Dial", 1, "fe80::1")] {
        let call = call_with_address(name, index, ArgExpr::literal(literal));
        let record = match_call_site(&call, &catalog).unwrap().record;
        assert!(!record.resolved, "{literal}");
        assert!(!record.has_structured_fields(), "{literal}");
        assert_eq!(record.raw_value, literal);
    }

    let call = call_with_address("net.Listen", 1, ArgExpr::literal("[::1]:8443"));
    let record = match_call_site(&call, &catalog).unwrap().record;
    assert_eq!(record.listen_interface.as_deref(), Some("::1"));
    assert_eq!(record.listen_port, Some(8443));
}
