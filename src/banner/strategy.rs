//! Port-to-strategy mapping for banner probing.
//!
//! The protocol is chosen from the port number alone; nothing is detected
//! on the wire. The mapping is plain data so callers can swap it out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Ports that get an HTTP `HEAD` probe by default.
pub const HTTP_PROBE_PORTS: [u16; 4] = [80, 8080, 8000, 8888];

/// Ports that get a TLS handshake followed by an HTTP `HEAD` probe by default.
pub const TLS_PROBE_PORTS: [u16; 2] = [443, 8443];

/// How to elicit a banner from an open port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStrategy {
    /// Read whatever the service sends on its own.
    PlainRead,
    /// Send `HEAD / HTTP/1.0` and read the response.
    HttpProbe,
    /// Wrap the connection in TLS, then behave like `HttpProbe`.
    TlsHttpProbe,
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainRead => write!(f, "plain"),
            Self::HttpProbe => write!(f, "http"),
            Self::TlsHttpProbe => write!(f, "tls+http"),
        }
    }
}

/// Maps ports to probe strategies. Unlisted ports use `PlainRead`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMap {
    overrides: HashMap<u16, ProbeStrategy>,
}

impl StrategyMap {
    /// A map where every port is probed with `PlainRead`.
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Assign `strategy` to `port`, replacing any previous entry.
    pub fn with(mut self, port: u16, strategy: ProbeStrategy) -> Self {
        self.overrides.insert(port, strategy);
        self
    }

    /// Look up the strategy for a port.
    pub fn strategy_for(&self, port: u16) -> ProbeStrategy {
        self.overrides
            .get(&port)
            .copied()
            .unwrap_or(ProbeStrategy::PlainRead)
    }
}

impl Default for StrategyMap {
    fn default() -> Self {
        let map = HTTP_PROBE_PORTS
            .iter()
            .fold(Self::empty(), |m, &p| m.with(p, ProbeStrategy::HttpProbe));
        TLS_PROBE_PORTS
            .iter()
            .fold(map, |m, &p| m.with(p, ProbeStrategy::TlsHttpProbe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let map = StrategyMap::default();
        for port in [80, 8080, 8000, 8888] {
            assert_eq!(map.strategy_for(port), ProbeStrategy::HttpProbe);
        }
        assert_eq!(map.strategy_for(443), ProbeStrategy::TlsHttpProbe);
        assert_eq!(map.strategy_for(8443), ProbeStrategy::TlsHttpProbe);
        assert_eq!(map.strategy_for(22), ProbeStrategy::PlainRead);
        assert_eq!(map.strategy_for(8081), ProbeStrategy::PlainRead);
    }

    #[test]
    fn test_override() {
        let map = StrategyMap::default()
            .with(22, ProbeStrategy::HttpProbe)
            .with(80, ProbeStrategy::PlainRead);
        assert_eq!(map.strategy_for(22), ProbeStrategy::HttpProbe);
        assert_eq!(map.strategy_for(80), ProbeStrategy::PlainRead);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProbeStrategy::TlsHttpProbe.to_string(), "tls+http");
    }
}
