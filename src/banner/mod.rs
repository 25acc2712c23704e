//! Banner grabbing for established TCP connections.
//!
//! The strategy is picked from the port number (see [`strategy`]): a
//! passive read, an HTTP `HEAD` probe, or the same probe inside TLS. When
//! a TLS peer completes the handshake but will not answer HTTP, its
//! certificate is rendered as the banner instead.
//!
//! Every failure comes back as a `ScanError`; callers decide whether to
//! surface it. The port scanner folds them into an empty banner.

pub mod strategy;
pub mod tls;

pub use strategy::{ProbeStrategy, StrategyMap, HTTP_PROBE_PORTS, TLS_PROBE_PORTS};

use crate::error::{ScanError, ScanResult};
use crate::http::url_host;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Maximum bytes to read for a banner.
pub const MAX_BANNER_SIZE: usize = 4096;

/// Pause between sending the HTTP probe and reading the answer.
const HTTP_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Probes open connections for a service banner.
#[derive(Debug, Clone)]
pub struct BannerProber {
    strategies: StrategyMap,
    timeout: Duration,
}

impl BannerProber {
    /// Create a prober.
    ///
    /// `timeout` bounds the TLS handshake and each read.
    pub fn new(strategies: StrategyMap, timeout: Duration) -> Self {
        Self {
            strategies,
            timeout,
        }
    }

    /// Grab a banner from `stream`, which is consumed and closed on return.
    pub async fn probe(&self, host: &str, port: u16, mut stream: TcpStream) -> ScanResult<String> {
        let strategy = self.strategies.strategy_for(port);
        debug!(host, port, %strategy, "Probing for banner.");

        let raw = match strategy {
            ProbeStrategy::PlainRead => read_banner(&mut stream, self.timeout).await?,
            ProbeStrategy::HttpProbe => http_exchange(&mut stream, host, self.timeout).await?,
            ProbeStrategy::TlsHttpProbe => self.probe_tls(host, port, stream).await?,
        };

        Ok(decode_banner(&raw))
    }

    async fn probe_tls(&self, host: &str, port: u16, stream: TcpStream) -> ScanResult<Vec<u8>> {
        let connector = tls::insecure_connector()?;
        let mut tls_stream = timeout(self.timeout, connector.connect(host, stream))
            .await
            .map_err(|_| ScanError::Timeout)??;

        match http_exchange(&mut tls_stream, host, self.timeout).await {
            Ok(raw) => Ok(raw),
            Err(e) => {
                debug!(host, port, error = %e, "HTTP over TLS failed, using peer certificate.");
                tls::peer_certificate_summary(&tls_stream).map(String::into_bytes)
            }
        }
    }
}

/// Minimal HTTP/1.0 `HEAD` request for `host`.
fn head_request(host: &str) -> Vec<u8> {
    format!("HEAD / HTTP/1.0\r\nHost: {}\r\n\r\n", url_host(host)).into_bytes()
}

async fn http_exchange<S>(stream: &mut S, host: &str, read_timeout: Duration) -> ScanResult<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(&head_request(host)).await?;
    sleep(HTTP_SETTLE_DELAY).await;
    read_banner(stream, read_timeout).await
}

/// Single bounded read of up to `MAX_BANNER_SIZE` bytes.
async fn read_banner<S>(stream: &mut S, read_timeout: Duration) -> ScanResult<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; MAX_BANNER_SIZE];
    let n = timeout(read_timeout, stream.read(&mut buffer))
        .await
        .map_err(|_| ScanError::Timeout)??;
    buffer.truncate(n);
    Ok(buffer)
}

/// Decode raw banner bytes, dropping invalid UTF-8 and trimming whitespace.
pub fn decode_banner(raw: &[u8]) -> String {
    let decoded: String = raw.utf8_chunks().map(|chunk| chunk.valid()).collect();
    decoded.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_http_stub, spawn_raw_stub};
    use tokio::net::TcpListener;

    async fn connect(port: u16) -> TcpStream {
        TcpStream::connect(("127.0.0.1", port)).await.unwrap()
    }

    #[test]
    fn test_decode_banner_drops_invalid_bytes() {
        assert_eq!(decode_banner(b"SSH-2.0-OpenSSH_8.9\r\n"), "SSH-2.0-OpenSSH_8.9");
        assert_eq!(decode_banner(b"\xffHello\xfe World \n"), "Hello World");
        assert_eq!(decode_banner(b""), "");
    }

    #[test]
    fn test_head_request() {
        assert_eq!(
            head_request("example.com"),
            b"HEAD / HTTP/1.0\r\nHost: example.com\r\n\r\n".to_vec()
        );
        assert_eq!(
            head_request("::1"),
            b"HEAD / HTTP/1.0\r\nHost: [::1]\r\n\r\n".to_vec()
        );
    }

    #[tokio::test]
    async fn test_plain_read_greeting() {
        let port = spawn_raw_stub(b"220 mail.example.com ESMTP Postfix\r\n").await;
        let prober = BannerProber::new(StrategyMap::empty(), Duration::from_secs(2));

        let banner = prober.probe("127.0.0.1", port, connect(port).await).await.unwrap();
        assert_eq!(banner, "220 mail.example.com ESMTP Postfix");
    }

    #[tokio::test]
    async fn test_plain_read_silent_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let stream = connect(port).await;
        let prober = BannerProber::new(StrategyMap::empty(), Duration::from_millis(100));

        let result = prober.probe("127.0.0.1", port, stream).await;
        assert!(matches!(result, Err(ScanError::Timeout)));
        drop(listener);
    }

    #[tokio::test]
    async fn test_http_probe() {
        let response = "HTTP/1.0 200 OK\r\nServer: nginx/1.18.0\r\n\r\n".to_string();
        let port = spawn_http_stub(response).await;
        let strategies = StrategyMap::empty().with(port, ProbeStrategy::HttpProbe);
        let prober = BannerProber::new(strategies, Duration::from_secs(2));

        let banner = prober.probe("127.0.0.1", port, connect(port).await).await.unwrap();
        assert!(banner.starts_with("HTTP/1.0 200 OK"));
        assert!(banner.contains("nginx/1.18.0"));
    }

    #[tokio::test]
    async fn test_tls_probe_against_plaintext_peer_fails() {
        let port = spawn_raw_stub(b"this is not a TLS server\r\n").await;
        let strategies = StrategyMap::empty().with(port, ProbeStrategy::TlsHttpProbe);
        let prober = BannerProber::new(strategies, Duration::from_secs(2));

        let result = prober.probe("127.0.0.1", port, connect(port).await).await;
        assert!(result.is_err());
    }
}
