//! Pattern catalog: qualified call name -> how to read its address argument.
//!
//! A catalog is an immutable value. Build one with [`PatternCatalogBuilder`]
//! (or take [`PatternCatalog::go_default`]) and share it by reference; several
//! catalogs can coexist, e.g. one per source dialect.

mod go_defaults;

use staticsocket_core::config::PatternConfig;
use staticsocket_core::errors::CatalogError;
use staticsocket_core::types::{Direction, FxHashMap, Protocol};

/// How to interpret one recognised call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternDescriptor {
    pub direction: Direction,
    pub protocol: Protocol,
    /// Zero-based index of the argument holding the address or URL.
    pub address_arg: usize,
    /// The argument is a URL (`scheme://host[:port]/path`) rather than an address.
    pub address_is_url: bool,
}

impl PatternDescriptor {
    pub const fn ingress(protocol: Protocol, address_arg: usize) -> Self {
        Self {
            direction: Direction::Ingress,
            protocol,
            address_arg,
            address_is_url: false,
        }
    }

    pub const fn egress(protocol: Protocol, address_arg: usize) -> Self {
        Self {
            direction: Direction::Egress,
            protocol,
            address_arg,
            address_is_url: false,
        }
    }

    pub const fn egress_url(protocol: Protocol, address_arg: usize) -> Self {
        Self {
            direction: Direction::Egress,
            protocol,
            address_arg,
            address_is_url: true,
        }
    }
}

impl From<&PatternConfig> for PatternDescriptor {
    fn from(config: &PatternConfig) -> Self {
        Self {
            direction: config.direction,
            protocol: config.protocol,
            address_arg: config.address_arg,
            address_is_url: config.address_is_url,
        }
    }
}

/// Read-only mapping from qualified call name to descriptor. Exact,
/// case-sensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    entries: FxHashMap<String, PatternDescriptor>,
}

impl PatternCatalog {
    /// Built-in catalog for Go's `net`, `net/http`, `crypto/tls` and gRPC.
    ///
    /// Built-in entries go through the same validation as configured ones; a
    /// rejected entry is logged and left out.
    pub fn go_default() -> Self {
        let mut builder = PatternCatalogBuilder::new();
        for (name, descriptor) in go_defaults::GO_PATTERNS {
            if let Err(e) = builder.add(name, *descriptor) {
                tracing::error!(pattern = %name, error = %e, "skipping built-in pattern");
            }
        }
        builder.build()
    }

    /// Built-in catalog plus user-configured entries. A configured entry that
    /// reuses a built-in name is a [`CatalogError::DuplicatePattern`].
    pub fn go_default_with(extra: &[PatternConfig]) -> Result<Self, CatalogError> {
        let mut builder = PatternCatalogBuilder::from_catalog(Self::go_default());
        for pattern in extra {
            builder.add(&pattern.name, PatternDescriptor::from(pattern))?;
        }
        Ok(builder.build())
    }

    pub fn lookup(&self, qualified_name: &str) -> Option<&PatternDescriptor> {
        self.entries.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entries.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternDescriptor)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

/// Accumulates entries, rejecting duplicate names.
#[derive(Debug, Default)]
pub struct PatternCatalogBuilder {
    entries: FxHashMap<String, PatternDescriptor>,
}

impl PatternCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: PatternCatalog) -> Self {
        Self {
            entries: catalog.entries,
        }
    }

    pub fn add(
        &mut self,
        name: &str,
        descriptor: PatternDescriptor,
    ) -> Result<&mut Self, CatalogError> {
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') {
            return Err(CatalogError::InvalidPattern {
                name: name.to_string(),
                message: "expected `receiver.member` or a bare identifier".to_string(),
            });
        }
        if self.entries.contains_key(name) {
            return Err(CatalogError::DuplicatePattern {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), descriptor);
        Ok(self)
    }

    pub fn build(self) -> PatternCatalog {
        PatternCatalog {
            entries: self.entries,
        }
    }
}
