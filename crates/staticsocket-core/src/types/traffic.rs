//! Traffic direction and protocol enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of a connection a call site sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Creates a listening socket.
    Ingress,
    /// Opens an outbound connection.
    Egress,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Egress => "egress",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ingress" => Ok(Self::Ingress),
            "egress" => Ok(Self::Egress),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// Transport or application protocol of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Unix,
    Http,
    Https,
    Grpc,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Unix => "unix",
            Self::Http => "http",
            Self::Https => "https",
            Self::Grpc => "grpc",
        }
    }

    /// HTTP-family protocols may be promoted by a URL scheme.
    pub fn is_http_family(&self) -> bool {
        matches!(self, Self::Http | Self::Https)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "unix" => Ok(Self::Unix),
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            "grpc" => Ok(Self::Grpc),
            other => Err(format!("unknown protocol: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!("Ingress".parse::<Direction>().unwrap(), Direction::Ingress);
        assert_eq!("EGRESS".parse::<Direction>().unwrap(), Direction::Egress);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_http_family() {
        assert!(Protocol::Http.is_http_family());
        assert!(Protocol::Https.is_http_family());
        assert!(!Protocol::Grpc.is_http_family());
        assert_eq!(Protocol::Unix.to_string(), "unix");
    }
}
