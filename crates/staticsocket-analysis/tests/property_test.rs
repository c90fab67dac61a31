use proptest::prelude::*;
use staticsocket_analysis::address::{parse_bind_address, parse_endpoint};
use staticsocket_analysis::catalog::PatternDescriptor;
use staticsocket_analysis::{AnalysisResult, SocketRecord};
use staticsocket_core::types::Protocol;

fn record(ingress: bool, line: u32) -> SocketRecord {
    let descriptor = if ingress {
        PatternDescriptor::ingress(Protocol::Tcp, 1)
    } else {
        PatternDescriptor::egress(Protocol::Tcp, 1)
    };
    let mut r = SocketRecord::new("net.Dial", &descriptor);
    r.source_line = line;
    r
}

fn counts_hold(result: &AnalysisResult) -> bool {
    result.total_count() == result.ingress_count() + result.egress_count()
        && result.total_count() == result.records().len()
}

proptest! {
    #[test]
    fn counts_hold_after_every_merge(files in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..8), 0..12)) {
        let mut result = AnalysisResult::new();
        prop_assert!(counts_hold(&result));
        for (line, file) in files.iter().enumerate() {
            result.merge_file(file.iter().map(|&ingress| record(ingress, line as u32)));
            prop_assert!(counts_hold(&result));
        }
        result.dedup();
        prop_assert!(counts_hold(&result));
        result.retain(|r| r.is_egress());
        prop_assert!(counts_hold(&result));
        prop_assert_eq!(result.ingress_count(), 0);
    }

    #[test]
    fn bare_port_always_binds_all_interfaces(port in any::<u16>()) {
        let bind = parse_bind_address(&format!(":{port}"));
        prop_assert_eq!(bind.port, Some(port));
        prop_assert_eq!(bind.interface.as_deref(), Some("0.0.0.0"));
    }

    #[test]
    fn explicit_url_port_wins(host in "[a-z][a-z0-9-]{0,20}(\\.[a-z]{2,5}){0,2}", port in any::<u16>(), tls in any::<bool>()) {
        let scheme = if tls { "https" } else { "http" };
        let endpoint = parse_endpoint(&format!("{scheme}://{host}:{port}/path"));
        prop_assert_eq!(endpoint.host.as_deref(), Some(host.as_str()));
        prop_assert_eq!(endpoint.port, Some(port));
    }

    #[test]
    fn parsers_never_panic(s in ".{0,64}") {
        let _ = parse_bind_address(&s);
        let _ = parse_endpoint(&s);
    }
}
