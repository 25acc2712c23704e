//! TCP Connect Scanner implementation.
//!
//! Completes a full TCP handshake per port through the [`connector`],
//! then hands the connection to the [`BannerProber`]. Resolution failures,
//! refusals, and timeouts all report the port as closed; a failed banner
//! probe never downgrades an open port.
//!
//! [`connector`]: super::connector

use super::connector;
use crate::banner::BannerProber;
use crate::scanner::traits::{PortResult, ScanConfig, Scanner};
use crate::types::Port;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// TCP Connect Scanner. Does not require elevated privileges.
pub struct TcpConnectScanner {
    host: String,
    timeout: Duration,
    prober: Option<BannerProber>,
}

impl TcpConnectScanner {
    /// Create a new TCP connect scanner from a configuration.
    pub fn new(config: ScanConfig) -> Self {
        let prober = config
            .grab_banners
            .then(|| BannerProber::new(config.strategies, config.timeout));
        Self {
            host: config.host,
            timeout: config.timeout,
            prober,
        }
    }
}

#[async_trait]
impl Scanner for TcpConnectScanner {
    fn host(&self) -> &str {
        &self.host
    }

    async fn scan_port(&self, port: Port) -> PortResult {
        let port_num = port.as_u16();

        let stream = match connector::connect(&self.host, port_num, self.timeout).await {
            Ok(stream) => stream,
            Err(e) => {
                debug!(host = %self.host, port = port_num, error = %e, "Port closed or filtered.");
                return PortResult::closed(port);
            }
        };

        let Some(prober) = &self.prober else {
            return PortResult::open(port, "");
        };

        // The prober owns the stream; it is closed when the probe returns.
        match prober.probe(&self.host, port_num, stream).await {
            Ok(banner) => PortResult::open(port, banner),
            Err(e) => {
                debug!(host = %self.host, port = port_num, error = %e, "Banner probe failed.");
                PortResult::open(port, "")
            }
        }
    }
}
