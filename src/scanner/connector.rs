//! Connector: resolves a host and opens one TCP connection to it.
//!
//! Resolution goes through the system resolver (hosts file included) and
//! prefers IPv4 addresses. Resolution and the connect itself run under a
//! single deadline.

use crate::error::{ScanError, ScanResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

/// Resolve `host:port`, preferring the first IPv4 address.
pub async fn resolve(host: &str, port: u16) -> ScanResult<SocketAddr> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|e| ScanError::DnsResolution {
            host: host.to_string(),
            reason: e.to_string(),
        })?
        .collect();

    pick_address(&addrs).ok_or_else(|| ScanError::NoAddresses(host.to_string()))
}

/// Choose the address to connect to: first IPv4, else the first of any family.
fn pick_address(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

/// Open a TCP connection to `host:port`.
///
/// Resolution and the handshake share one `connect_timeout` deadline.
pub async fn connect(host: &str, port: u16, connect_timeout: Duration) -> ScanResult<TcpStream> {
    let attempt = async {
        let addr = resolve(host, port).await?;
        TcpStream::connect(addr).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::ConnectionRefused => ScanError::ConnectionRefused,
            _ => ScanError::ConnectionFailed {
                target: host.to_string(),
                port,
                reason: e.to_string(),
            },
        })
    };

    timeout(connect_timeout, attempt)
        .await
        .map_err(|_| ScanError::Timeout)?
}
