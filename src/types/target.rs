//! Scan target: a host plus the normalized set of ports to probe.
//!
//! The host is kept as typed (domain name or IP literal). It is never
//! validated up front: a malformed host simply fails resolution and every
//! port reports closed.

use super::port::{default_ports, Port};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A host and the ports to probe on it.
///
/// Invariant: `ports` is sorted, free of duplicates, and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    host: String,
    ports: Vec<Port>,
}

impl ScanTarget {
    /// Create a target from raw port numbers.
    ///
    /// Zeroes are dropped and the rest sorted and deduplicated. If nothing
    /// remains, the default port set is used.
    pub fn new(host: impl Into<String>, ports: impl IntoIterator<Item = u16>) -> Self {
        Self::from_ports(host, ports.into_iter().filter_map(Port::new))
    }

    /// Create a target that probes the default port set.
    pub fn with_default_ports(host: impl Into<String>) -> Self {
        Self::from_ports(host, std::iter::empty())
    }

    /// Create a target from already validated ports.
    pub fn from_ports(host: impl Into<String>, ports: impl IntoIterator<Item = Port>) -> Self {
        let mut ports: Vec<Port> = ports.into_iter().collect();
        ports.sort_unstable();
        ports.dedup();
        if ports.is_empty() {
            ports = default_ports();
        }
        Self {
            host: host.into(),
            ports,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ports)", self.host, self.ports.len())
    }
}
