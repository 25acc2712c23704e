//! Scanner trait abstraction.
//!
//! Defines the per-port result type and a common interface for scanner
//! implementations, so the orchestration in [`super::run_scan`] can be
//! exercised without real sockets.

use crate::banner::StrategyMap;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default connect timeout per port.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(1500);

/// Outcome of probing a single port. Produced exactly once per requested port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    /// The port number that was scanned.
    pub port: u16,
    /// Whether a TCP connection completed within the timeout.
    pub open: bool,
    /// Decoded banner, empty when none was obtained.
    pub banner: String,
}

impl PortResult {
    /// A port that could not be reached.
    pub fn closed(port: Port) -> Self {
        Self {
            port: port.as_u16(),
            open: false,
            banner: String::new(),
        }
    }

    /// A port that accepted a connection.
    pub fn open(port: Port, banner: impl Into<String>) -> Self {
        Self {
            port: port.as_u16(),
            open: true,
            banner: banner.into(),
        }
    }

    /// Check if a banner was captured.
    pub fn has_banner(&self) -> bool {
        !self.banner.is_empty()
    }
}

/// Configuration for scanning one host.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Host as given by the user (domain name or IP literal).
    pub host: String,
    /// Connect timeout, also used for the banner handshake and reads.
    pub timeout: Duration,
    /// Whether to attempt banner grabbing on open ports.
    pub grab_banners: bool,
    /// Port-to-strategy mapping used for banner grabbing.
    pub strategies: StrategyMap,
}

impl ScanConfig {
    /// Create a new scan configuration with defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: DEFAULT_CONNECT_TIMEOUT,
            grab_banners: true,
            strategies: StrategyMap::default(),
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable banner grabbing.
    pub fn without_banners(mut self) -> Self {
        self.grab_banners = false;
        self
    }

    /// Replace the banner strategy mapping.
    pub fn with_strategies(mut self, strategies: StrategyMap) -> Self {
        self.strategies = strategies;
        self
    }
}

/// Trait for port scanner implementations.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Scan a single port. Never fails: problems are folded into the result.
    async fn scan_port(&self, port: Port) -> PortResult;

    /// Host being scanned.
    fn host(&self) -> &str;
}
