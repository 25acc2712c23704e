//! Technology detection from banners and HTTP probes.
//!
//! Classification is table driven (see [`signatures`]). Banners from a
//! prior port scan are matched first; then the HTTP(S) ports the scan
//! found open are probed with [`HttpProber`] and their headers and body
//! are matched as well. Without usable port data, the bare host is probed
//! over both HTTP and HTTPS.

pub mod signatures;

use crate::http::{
    url_host, HttpProbeResult, HttpProber, DEFAULT_HTTP_TIMEOUT, DEFAULT_USER_AGENT,
};
use crate::scanner::PortResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

/// Prefix for tags carrying the exact generator meta value.
pub const META_GENERATOR_PREFIX: &str = "meta_generator:";

/// Ports re-probed over plain HTTP when found open.
pub const DEFAULT_HTTP_PORTS: [u16; 4] = [80, 8080, 8000, 8888];

/// Ports re-probed over HTTPS when found open.
pub const DEFAULT_HTTPS_PORTS: [u16; 2] = [443, 8443];

/// Detector settings.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub http_ports: BTreeSet<u16>,
    pub https_ports: BTreeSet<u16>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            http_ports: DEFAULT_HTTP_PORTS.into_iter().collect(),
            https_ports: DEFAULT_HTTPS_PORTS.into_iter().collect(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DetectorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_http_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.http_ports = ports.into_iter().collect();
        self
    }

    pub fn with_https_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.https_ports = ports.into_iter().collect();
        self
    }
}

/// Result of a detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyReport {
    /// Tags matched from service banners.
    pub banner_matches: BTreeSet<String>,
    /// Every HTTP(S) probe attempted, failures included.
    pub http_probes: Vec<HttpProbeResult>,
    /// Union of banner and HTTP tags.
    pub guesses: BTreeSet<String>,
}

/// One planned HTTP(S) probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    pub host_port: String,
    pub use_tls: bool,
}

/// Runs detection against a host.
#[derive(Debug, Clone)]
pub struct TechDetector {
    prober: HttpProber,
    config: DetectorConfig,
}

impl TechDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, reqwest::Error> {
        let prober = HttpProber::new(config.timeout, &config.user_agent)?;
        Ok(Self { prober, config })
    }

    /// Classify `host` from optional port scan results plus HTTP probes.
    ///
    /// Never fails: unreachable probes are recorded and contribute no tags.
    pub async fn detect(&self, host: &str, port_results: Option<&[PortResult]>) -> TechnologyReport {
        let banner_matches = analyze_banners(
            port_results
                .unwrap_or_default()
                .iter()
                .map(|r| r.banner.as_str()),
        );
        let mut guesses = banner_matches.clone();

        let plan = plan_http_probes(host, port_results, &self.config);
        info!(host, probes = plan.len(), "Starting technology detection.");

        let mut http_probes = Vec::with_capacity(plan.len());
        for probe in plan {
            let result = self.prober.probe(&probe.host_port, probe.use_tls).await;
            let tags = analyze_http_response(&result);
            debug!(url = result.url(), tags = tags.len(), "HTTP probe analyzed.");
            guesses.extend(tags);
            http_probes.push(result);
        }

        info!(host, guesses = guesses.len(), "Technology detection finished.");
        TechnologyReport {
            banner_matches,
            http_probes,
            guesses,
        }
    }
}

/// Match each non-empty banner against the banner table.
pub fn analyze_banners<'a>(banners: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for banner in banners.into_iter().filter(|b| !b.is_empty()) {
        for rule in signatures::banner_rules() {
            found.extend(rule.matches(banner).into_iter().map(String::from));
        }
    }
    found
}

/// Tags derived from one probe's headers and body. Failed probes yield none.
pub fn analyze_http_response(probe: &HttpProbeResult) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let Some(body) = probe.body_snippet() else {
        return found;
    };

    for (header, rules) in signatures::header_rules() {
        if let Some(value) = probe.header(header).filter(|v| !v.is_empty()) {
            for rule in rules {
                found.extend(rule.matches(value).into_iter().map(String::from));
            }
        }
    }

    for rule in signatures::body_rules() {
        found.extend(rule.matches(body).into_iter().map(String::from));
    }

    if let Some(generator) = signatures::extract_meta_generator(body) {
        for rule in signatures::generator_rules() {
            found.extend(rule.matches(&generator).into_iter().map(String::from));
        }
        found.insert(format!("{META_GENERATOR_PREFIX}{generator}"));
    }

    found
}

/// Decide which HTTP(S) endpoints to probe.
///
/// Open ports from the scan that fall in the configured HTTP / HTTPS sets
/// are probed individually. If there are none, or no scan data at all, the
/// bare host is probed over HTTP and then HTTPS.
pub fn plan_http_probes(
    host: &str,
    port_results: Option<&[PortResult]>,
    config: &DetectorConfig,
) -> Vec<ProbePlan> {
    let open: BTreeSet<u16> = port_results
        .unwrap_or_default()
        .iter()
        .filter(|r| r.open)
        .map(|r| r.port)
        .collect();

    let http: Vec<u16> = open.intersection(&config.http_ports).copied().collect();
    let https: Vec<u16> = open.intersection(&config.https_ports).copied().collect();
    let authority = url_host(host);

    if http.is_empty() && https.is_empty() {
        return vec![
            ProbePlan {
                host_port: authority.clone(),
                use_tls: false,
            },
            ProbePlan {
                host_port: authority,
                use_tls: true,
            },
        ];
    }

    let plain = http.into_iter().map(|port| ProbePlan {
        host_port: with_port(&authority, port, 80),
        use_tls: false,
    });
    let tls = https.into_iter().map(|port| ProbePlan {
        host_port: with_port(&authority, port, 443),
        use_tls: true,
    });
    plain.chain(tls).collect()
}

fn with_port(host: &str, port: u16, canonical: u16) -> String {
    if port == canonical {
        host.to_string()
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ProbeFailure;
    use crate::test_support::{http_response, spawn_http_stub, spawn_raw_stub, spawn_tls_stub};
    use crate::types::Port;
    use std::collections::BTreeMap;

    fn open(port: u16, banner: &str) -> PortResult {
        PortResult::open(Port::new(port).unwrap(), banner)
    }

    fn closed(port: u16) -> PortResult {
        PortResult::closed(Port::new(port).unwrap())
    }

    fn response(headers: &[(&str, &str)], body: &str) -> HttpProbeResult {
        HttpProbeResult::Response {
            url: "http://example.com/".into(),
            status_code: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            body_snippet: body.into(),
        }
    }

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_analyze_banners() {
        let found = analyze_banners([
            "SSH-2.0-OpenSSH_8.9p1 Ubuntu",
            "",
            "HTTP/1.0 200 OK\r\nServer: nginx/1.18.0",
        ]);
        assert_eq!(found, set(&["nginx", "openssh", "ssh-"]));
        assert!(analyze_banners(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_analyze_banners_multi_tag_rule() {
        let found = analyze_banners(["220 mx.example.com ESMTP Postfix"]);
        assert_eq!(found, set(&["exim", "postfix", "sendmail"]));
    }

    #[test]
    fn test_analyze_headers() {
        let probe = response(
            &[("server", "nginx/1.18.0"), ("x-powered-by", "Express")],
            "",
        );
        assert_eq!(analyze_http_response(&probe), set(&["nginx", "node/express"]));
    }

    #[test]
    fn test_analyze_body_markers() {
        let probe = response(
            &[],
            r#"<link href="/wp-content/themes/x/style.css"><p>Powered by Ruby</p>"#,
        );
        assert_eq!(analyze_http_response(&probe), set(&["ruby", "wordpress"]));
    }

    #[test]
    fn test_analyze_meta_generator() {
        let probe = response(&[], r#"<meta name="generator" content="WordPress 6.0">"#);
        let found = analyze_http_response(&probe);
        assert!(found.contains("wordpress"));
        assert!(found.contains("meta_generator:WordPress 6.0"));
    }

    #[test]
    fn test_analyze_failed_probe() {
        let failed = HttpProbeResult::Failed {
            url: "https://example.com/".into(),
            error: ProbeFailure::RequestFailed,
        };
        assert!(analyze_http_response(&failed).is_empty());
    }

    #[test]
    fn test_plan_without_port_data() {
        let config = DetectorConfig::default();
        let expected = vec![
            ProbePlan {
                host_port: "example.com".into(),
                use_tls: false,
            },
            ProbePlan {
                host_port: "example.com".into(),
                use_tls: true,
            },
        ];
        assert_eq!(plan_http_probes("example.com", None, &config), expected);

        let no_web = [open(22, "SSH-2.0"), closed(80), closed(443)];
        assert_eq!(plan_http_probes("example.com", Some(&no_web[..]), &config), expected);
    }

    #[test]
    fn test_plan_from_open_ports() {
        let config = DetectorConfig::default();
        let results = [open(80, ""), open(443, ""), open(8080, ""), open(8443, ""), closed(8000)];
        let plan = plan_http_probes("example.com", Some(&results[..]), &config);
        let got: Vec<(&str, bool)> = plan
            .iter()
            .map(|p| (p.host_port.as_str(), p.use_tls))
            .collect();
        assert_eq!(
            got,
            vec![
                ("example.com", false),
                ("example.com:8080", false),
                ("example.com", true),
                ("example.com:8443", true),
            ]
        );
    }

    #[test]
    fn test_plan_brackets_ipv6() {
        let config = DetectorConfig::default();
        let results = [open(8080, "")];
        let plan = plan_http_probes("::1", Some(&results[..]), &config);
        assert_eq!(plan[0].host_port, "[::1]:8080");
    }

    #[tokio::test]
    async fn test_detect_server_header() {
        let port = spawn_http_stub(http_response(
            "200 OK",
            &[("Server", "nginx/1.18.0")],
            "<html></html>",
        ))
        .await;
        let config = DetectorConfig::default()
            .with_http_ports([port])
            .with_timeout(Duration::from_secs(2));
        let detector = TechDetector::new(config).unwrap();

        let results = [open(port, "")];
        let report = detector.detect("127.0.0.1", Some(&results[..])).await;

        assert_eq!(report.http_probes.len(), 1);
        assert!(report.guesses.contains("nginx"));
    }

    #[tokio::test]
    async fn test_detect_merges_banner_and_body_tags() {
        let port = spawn_http_stub(http_response(
            "200 OK",
            &[],
            r#"<html><head><meta name="generator" content="WordPress 6.0"></head></html>"#,
        ))
        .await;
        let config = DetectorConfig::default()
            .with_http_ports([port])
            .with_timeout(Duration::from_secs(2));
        let detector = TechDetector::new(config).unwrap();

        let results = [open(22, "SSH-2.0-OpenSSH_9.6"), open(port, "")];
        let report = detector.detect("127.0.0.1", Some(&results[..])).await;

        assert_eq!(report.banner_matches, set(&["openssh", "ssh-"]));
        for tag in ["openssh", "wordpress", "meta_generator:WordPress 6.0"] {
            assert!(report.guesses.contains(tag), "missing {tag}");
        }
    }

    #[tokio::test]
    async fn test_detect_records_failed_https_probe() {
        // Speaks plaintext garbage on a port treated as HTTPS.
        let port = spawn_raw_stub(b"not tls at all\r\n").await;
        let config = DetectorConfig::default()
            .with_https_ports([port])
            .with_timeout(Duration::from_secs(2));
        let detector = TechDetector::new(config).unwrap();

        let results = [open(port, "")];
        let report = detector.detect("127.0.0.1", Some(&results[..])).await;

        assert_eq!(report.http_probes.len(), 1);
        assert!(report.http_probes[0].is_failure());
        assert_eq!(report.http_probes[0].url(), format!("https://127.0.0.1:{port}/"));
        assert!(report.guesses.is_empty());
    }

    #[tokio::test]
    async fn test_detect_self_signed_https_service() {
        let response = http_response("200 OK", &[("Server", "Apache/2.4")], "<html></html>");
        let port = spawn_tls_stub(Some(response)).await;
        let config = DetectorConfig::default()
            .with_https_ports([port])
            .with_timeout(Duration::from_secs(2));
        let detector = TechDetector::new(config).unwrap();

        let results = [open(port, "")];
        let report = detector.detect("127.0.0.1", Some(&results[..])).await;

        assert_eq!(report.http_probes.len(), 1);
        let probe = &report.http_probes[0];
        assert_eq!(probe.url(), format!("https://127.0.0.1:{port}/"));
        assert!(matches!(probe, HttpProbeResult::Response { status_code: 200, .. }));
        assert_eq!(report.guesses, set(&["apache"]));
    }

    #[tokio::test]
    async fn test_detect_silent_tls_service_is_recorded() {
        let port = spawn_tls_stub(None).await;
        let config = DetectorConfig::default()
            .with_https_ports([port])
            .with_timeout(Duration::from_millis(500));
        let detector = TechDetector::new(config).unwrap();

        let results = [open(port, "")];
        let report = detector.detect("127.0.0.1", Some(&results[..])).await;

        assert_eq!(report.http_probes.len(), 1);
        assert!(report.http_probes[0].is_failure());
        assert!(report.guesses.is_empty());
    }
}
