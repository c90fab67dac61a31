//! Socket record: one detected call site.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use staticsocket_core::types::{Direction, Protocol};

use crate::address::{self, BindAddress, Endpoint};
use crate::catalog::PatternDescriptor;

/// One socket-creating call site.
///
/// Ingress records only ever carry `listen_*` fields and egress records only
/// `destination_*` fields; the `apply_*` methods enforce this. `resolved` is
/// true exactly when at least one of those fields was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketRecord {
    pub direction: Direction,
    pub protocol: Protocol,
    /// Catalog key that matched, e.g. `net.Dial`.
    pub pattern_id: String,
    /// Literal or best-effort textual form of the address argument.
    pub raw_value: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
    pub source_file: PathBuf,
    pub source_line: u32,
    pub owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
}

impl SocketRecord {
    /// An unresolved record for a catalog match, without provenance.
    pub fn new(pattern_id: impl Into<String>, descriptor: &PatternDescriptor) -> Self {
        Self {
            direction: descriptor.direction,
            protocol: descriptor.protocol,
            pattern_id: pattern_id.into(),
            raw_value: String::new(),
            resolved: false,
            listen_port: None,
            listen_interface: None,
            destination_host: None,
            destination_port: None,
            source_file: PathBuf::new(),
            source_line: 0,
            owner_name: String::new(),
            function_name: None,
        }
    }

    pub fn is_ingress(&self) -> bool {
        self.direction == Direction::Ingress
    }

    pub fn is_egress(&self) -> bool {
        self.direction == Direction::Egress
    }

    /// Parse `value` with the parser for this record's direction and store
    /// whatever fields it yields. Returns whether any field was derived.
    ///
    /// Ingress values use the bind-address parser. Egress values use the URL
    /// parser when `is_url` is set, the dial-address parser otherwise.
    pub fn apply_address(&mut self, value: &str, is_url: bool) -> bool {
        match self.direction {
            Direction::Ingress => self.apply_bind(address::parse_bind_address(value)),
            Direction::Egress if is_url => self.apply_endpoint(address::parse_endpoint(value)),
            Direction::Egress => self.apply_endpoint(address::parse_dial_address(value)),
        }
    }

    /// Store a parsed bind address. No-op on egress records.
    pub fn apply_bind(&mut self, bind: BindAddress) -> bool {
        if !self.is_ingress() || bind.is_empty() {
            return false;
        }
        self.listen_interface = bind.interface;
        self.listen_port = bind.port;
        self.resolved = true;
        true
    }

    /// Store a parsed endpoint. No-op on ingress records.
    ///
    /// A URL scheme promotes an HTTP-family protocol (`http` -> `https`),
    /// but only when the endpoint yields a host or port.
    pub fn apply_endpoint(&mut self, endpoint: Endpoint) -> bool {
        if !self.is_egress() || endpoint.is_empty() {
            return false;
        }
        if let Some(scheme) = endpoint.scheme {
            if self.protocol.is_http_family() {
                self.protocol = scheme;
            }
        }
        self.destination_host = endpoint.host;
        self.destination_port = endpoint.port;
        self.resolved = true;
        true
    }

    /// Any structured address field is populated.
    pub fn has_structured_fields(&self) -> bool {
        self.listen_port.is_some()
            || self.listen_interface.is_some()
            || self.destination_host.is_some()
            || self.destination_port.is_some()
    }

    /// Populated fields match the direction, and `resolved` matches their presence.
    pub fn is_consistent(&self) -> bool {
        let fields_match_direction = match self.direction {
            Direction::Ingress => {
                self.destination_host.is_none() && self.destination_port.is_none()
            }
            Direction::Egress => self.listen_port.is_none() && self.listen_interface.is_none(),
        };
        fields_match_direction && self.resolved == self.has_structured_fields()
    }
}
