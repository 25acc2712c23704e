//! TLS support for banner probing.
//!
//! WARNING: the connector built here accepts any certificate for any host.
//! Banner grabbing must succeed against self-signed and expired
//! certificates, so neither the chain nor the hostname is verified. Never
//! reuse this connector for traffic that needs authentication, and only
//! point it at targets you are authorized to probe.

use crate::error::{ScanError, ScanResult};
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, TlsStream};
use x509_parser::prelude::*;

/// Build a TLS connector with certificate and hostname verification disabled.
pub fn insecure_connector() -> ScanResult<TlsConnector> {
    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()?;
    Ok(TlsConnector::from(connector))
}

/// Render the peer certificate of an established session as banner text.
pub fn peer_certificate_summary(stream: &TlsStream<TcpStream>) -> ScanResult<String> {
    let cert = stream
        .get_ref()
        .peer_certificate()?
        .ok_or_else(|| ScanError::Tls("peer presented no certificate".to_string()))?;
    summarize_certificate(&cert.to_der()?)
}

/// Summarize a DER-encoded certificate as `key=value` pairs.
pub fn summarize_certificate(der: &[u8]) -> ScanResult<String> {
    let (_, x509) = parse_x509_certificate(der)
        .map_err(|e| ScanError::Tls(format!("certificate parse error: {e}")))?;
    let validity = x509.validity();

    let mut summary = format!(
        "subject={}; issuer={}; serial={}; not_before={}; not_after={}",
        x509.subject(),
        x509.issuer(),
        x509.raw_serial_as_string(),
        validity.not_before,
        validity.not_after,
    );

    if let Ok(Some(san)) = x509.subject_alternative_name() {
        let names: Vec<String> = san
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some((*dns).to_string()),
                _ => None,
            })
            .collect();
        if !names.is_empty() {
            summary.push_str("; dns_names=");
            summary.push_str(&names.join(","));
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_builds() {
        assert!(insecure_connector().is_ok());
    }

    #[test]
    fn test_summarize_self_signed_certificate() {
        let rcgen::CertifiedKey { cert, .. } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();

        let summary = summarize_certificate(cert.der()).unwrap();
        assert!(summary.starts_with("subject=CN=rcgen self signed cert; issuer="));
        assert!(summary.contains("; serial="));
        assert!(summary.contains("; not_after="));
        assert!(summary.ends_with("; dns_names=localhost"));
    }

    #[test]
    fn test_summarize_rejects_garbage() {
        let err = summarize_certificate(b"definitely not DER").unwrap_err();
        assert!(matches!(err, ScanError::Tls(_)));
    }
}
