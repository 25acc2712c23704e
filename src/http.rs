//! HTTP fingerprint prober.
//!
//! Issues a single `GET /` over HTTP or HTTPS, following redirects, and
//! keeps the status, lower-cased headers, and the start of the body for
//! the technology detector. Runs over its own connections, independent of
//! the port scanner's sockets.
//!
//! Certificate and hostname validation are disabled so self-signed hosts
//! can still be fingerprinted. Only probe hosts you are authorized to scan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv6Addr;
use std::time::Duration;
use tracing::debug;

/// Maximum number of body characters kept in a probe result.
pub const MAX_BODY_SNIPPET: usize = 8000;

/// Default timeout for a whole probe request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(4);

/// Client identifier sent with every probe.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ReconScan/0.1)";

/// Why a probe produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    RequestFailed,
}

/// Outcome of one HTTP(S) probe: either a response or a failure, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HttpProbeResult {
    Response {
        url: String,
        status_code: u16,
        headers: BTreeMap<String, String>,
        body_snippet: String,
    },
    Failed {
        url: String,
        error: ProbeFailure,
    },
}

impl HttpProbeResult {
    pub fn url(&self) -> &str {
        match self {
            Self::Response { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Look up a header by its lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            Self::Response { headers, .. } => headers.get(name).map(String::as_str),
            Self::Failed { .. } => None,
        }
    }

    pub fn body_snippet(&self) -> Option<&str> {
        match self {
            Self::Response { body_snippet, .. } => Some(body_snippet),
            Self::Failed { .. } => None,
        }
    }
}

/// Performs HTTP(S) probes with a shared client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Build a prober. Fails only if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    /// Probe `http(s)://<host_or_host_port>/`.
    pub async fn probe(&self, host_or_host_port: &str, use_tls: bool) -> HttpProbeResult {
        let scheme = if use_tls { "https" } else { "http" };
        let url = format!("{scheme}://{host_or_host_port}/");

        match self.fetch(&url).await {
            Ok(result) => result,
            Err(e) => {
                debug!(url = %url, error = %e, "HTTP probe failed.");
                HttpProbeResult::Failed {
                    url,
                    error: ProbeFailure::RequestFailed,
                }
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<HttpProbeResult, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.text().await?;
        debug!(url, status_code, bytes = body.len(), "HTTP probe answered.");

        Ok(HttpProbeResult::Response {
            url: url.to_string(),
            status_code,
            headers,
            body_snippet: truncate_chars(&body, MAX_BODY_SNIPPET).to_string(),
        })
    }
}

/// Bracket IPv6 literals so they can sit in a URL authority or `Host` header.
pub fn url_host(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]")
    } else {
        host.to_string()
    }
}

/// Flatten a header map; repeated headers are joined with `", "`.
fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        out.entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    out
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
