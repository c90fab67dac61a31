//! Built-in Go entries.

use staticsocket_core::types::Protocol;

use super::PatternDescriptor;

pub(super) const GO_PATTERNS: &[(&str, PatternDescriptor)] = &[
    // Listeners
    ("net.Listen", PatternDescriptor::ingress(Protocol::Tcp, 1)),
    ("net.ListenTCP", PatternDescriptor::ingress(Protocol::Tcp, 1)),
    ("net.ListenUDP", PatternDescriptor::ingress(Protocol::Udp, 1)),
    ("net.ListenUnix", PatternDescriptor::ingress(Protocol::Unix, 1)),
    ("tls.Listen", PatternDescriptor::ingress(Protocol::Tcp, 1)),
    ("http.ListenAndServe", PatternDescriptor::ingress(Protocol::Http, 0)),
    ("http.ListenAndServeTLS", PatternDescriptor::ingress(Protocol::Https, 0)),
    // Dialers
    ("net.Dial", PatternDescriptor::egress(Protocol::Tcp, 1)),
    ("net.DialTimeout", PatternDescriptor::egress(Protocol::Tcp, 1)),
    ("net.DialTCP", PatternDescriptor::egress(Protocol::Tcp, 2)),
    ("net.DialUDP", PatternDescriptor::egress(Protocol::Udp, 2)),
    ("net.DialUnix", PatternDescriptor::egress(Protocol::Unix, 2)),
    ("tls.Dial", PatternDescriptor::egress(Protocol::Tcp, 1)),
    // HTTP clients
    ("http.Get", PatternDescriptor::egress_url(Protocol::Http, 0)),
    ("http.Head", PatternDescriptor::egress_url(Protocol::Http, 0)),
    ("http.Post", PatternDescriptor::egress_url(Protocol::Http, 0)),
    ("http.PostForm", PatternDescriptor::egress_url(Protocol::Http, 0)),
    ("http.NewRequest", PatternDescriptor::egress_url(Protocol::Http, 1)),
    (
        "http.NewRequestWithContext",
        PatternDescriptor::egress_url(Protocol::Http, 2),
    ),
    // gRPC
    ("grpc.Dial", PatternDescriptor::egress(Protocol::Grpc, 0)),
    ("grpc.NewClient", PatternDescriptor::egress(Protocol::Grpc, 0)),
    ("grpc.DialContext", PatternDescriptor::egress(Protocol::Grpc, 1)),
];
