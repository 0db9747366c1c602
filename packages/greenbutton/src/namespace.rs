//! Namespace registry for the Atom envelope and the ESPI payload vocabulary.

use std::sync::LazyLock;

/// Atom envelope namespace (feed, entry, link, content, header fields).
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// ESPI payload namespace (UsagePoint, IntervalBlock, ...).
pub const ESPI_NS: &str = "http://naesb.org/espi";

/// Canonical prefix for the Atom namespace.
pub const ATOM: &str = "atom";

/// Canonical prefix for the ESPI namespace.
pub const ESPI: &str = "espi";

static DEFAULT: LazyLock<Namespaces> = LazyLock::new(Namespaces::espi);

/// Immutable mapping from short prefix to namespace URI.
///
/// Each URI has exactly one prefix. The registry is built once and handed to
/// every decoder; lookups never change for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    entries: Vec<(&'static str, &'static str)>,
}

impl Namespaces {
    /// Registry for Green Button documents.
    #[must_use]
    pub fn espi() -> Self {
        Self {
            entries: vec![(ATOM, ATOM_NS), (ESPI, ESPI_NS)],
        }
    }

    /// Process-wide default registry.
    #[must_use]
    pub fn shared() -> &'static Namespaces {
        &DEFAULT
    }

    /// Resolve a prefix to its namespace URI.
    #[must_use]
    pub fn uri(&self, prefix: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
    }

    /// Resolve a namespace URI to its canonical prefix.
    #[must_use]
    pub fn prefix(&self, uri: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, u)| *u == uri)
            .map(|(prefix, _)| *prefix)
    }

    /// Atom namespace URI.
    #[must_use]
    pub fn atom(&self) -> &'static str {
        self.uri(ATOM).unwrap_or(ATOM_NS)
    }

    /// ESPI namespace URI.
    #[must_use]
    pub fn espi_ns(&self) -> &'static str {
        self.uri(ESPI).unwrap_or(ESPI_NS)
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::espi()
    }
}
