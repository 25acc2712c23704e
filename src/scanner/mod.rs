//! Scanner module - bounded-parallelism TCP port scanning.
//!
//! Each port is scanned independently by a [`Scanner`]; at most
//! `min(concurrency, port count)` scans are in flight at once. Results are
//! collected in completion order and sorted by port before they are
//! returned, so callers always see one result per requested port in
//! ascending order.

pub mod connector;
pub mod tcp;
pub mod traits;

pub use tcp::TcpConnectScanner;
pub use traits::{PortResult, ScanConfig, Scanner, DEFAULT_CONNECT_TIMEOUT};

use crate::types::{Port, ScanTarget};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::info;

/// Default upper bound on concurrent port scans.
pub const DEFAULT_MAX_CONCURRENCY: usize = 30;

/// Which ports to scan and how many at once.
#[derive(Debug, Clone)]
pub struct ScanJobConfig {
    pub ports: Vec<Port>,
    pub concurrency: usize,
    pub verbose: bool,
}

impl ScanJobConfig {
    /// Create a job over `ports` with the default concurrency.
    pub fn new(ports: Vec<Port>) -> Self {
        Self {
            ports,
            concurrency: DEFAULT_MAX_CONCURRENCY,
            verbose: false,
        }
    }

    /// Create a job over a target's normalized ports.
    pub fn from_target(target: &ScanTarget) -> Self {
        Self::new(target.ports().to_vec())
    }

    /// Set the maximum number of concurrent scans.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Show a progress bar while scanning.
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Number of scans allowed in flight: `min(concurrency, ports)`, at least 1.
    pub fn worker_count(&self) -> usize {
        self.concurrency.min(self.ports.len()).max(1)
    }
}

/// Scan every port in `job` with `scanner`, returning results sorted by port.
pub async fn run_scan<S>(scanner: &S, job: ScanJobConfig) -> Vec<PortResult>
where
    S: Scanner + ?Sized,
{
    let workers = job.worker_count();
    let total = job.ports.len();
    let start = Instant::now();
    info!(host = scanner.host(), ports = total, workers, "Starting port scan.");

    let progress = job.verbose.then(|| progress_bar(total as u64));

    let mut results: Vec<PortResult> = stream::iter(job.ports)
        .map(|port| {
            let progress = progress.clone();
            async move {
                let result = scanner.scan_port(port).await;
                if let Some(pb) = &progress {
                    pb.inc(1);
                    if result.open {
                        pb.set_message(format!("Found open port: {}", port));
                    }
                }
                result
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await;

    if let Some(pb) = progress {
        pb.finish_with_message("Scan complete");
    }

    results.sort_by_key(|r| r.port);

    info!(
        host = scanner.host(),
        open = results.iter().filter(|r| r.open).count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Port scan finished."
    );
    results
}

/// Scan a target with the TCP connect scanner.
pub async fn scan_target(
    target: &ScanTarget,
    connect_timeout: Duration,
    max_concurrency: usize,
) -> Vec<PortResult> {
    let scanner =
        TcpConnectScanner::new(ScanConfig::new(target.host()).with_timeout(connect_timeout));
    let job = ScanJobConfig::from_target(target).with_concurrency(max_concurrency);
    run_scan(&scanner, job).await
}

/// Scan `ports` (or the default set when `None` or empty) on `host`.
pub async fn scan(
    host: &str,
    ports: Option<&[u16]>,
    connect_timeout: Duration,
    max_concurrency: usize,
) -> Vec<PortResult> {
    let target = ScanTarget::new(host, ports.unwrap_or_default().iter().copied());
    scan_target(&target, connect_timeout, max_concurrency).await
}

fn progress_bar(len: u64) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_PORTS;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    /// Reports even ports open; tracks how many scans run at once.
    struct MockScanner {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl MockScanner {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Scanner for MockScanner {
        async fn scan_port(&self, port: Port) -> PortResult {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            // Later ports finish first so completion order is scrambled.
            let delay = 40 - (port.as_u16() % 8) as u64 * 5;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if port.as_u16() % 2 == 0 {
                PortResult::open(port, "mock")
            } else {
                PortResult::closed(port)
            }
        }

        fn host(&self) -> &str {
            "mock"
        }
    }

    fn ports(range: std::ops::RangeInclusive<u16>) -> Vec<Port> {
        range.filter_map(Port::new).collect()
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(ScanJobConfig::new(ports(1..=100)).worker_count(), 30);
        assert_eq!(ScanJobConfig::new(ports(1..=5)).worker_count(), 5);
        assert_eq!(
            ScanJobConfig::new(ports(1..=100)).with_concurrency(0).worker_count(),
            1
        );
        assert_eq!(ScanJobConfig::new(Vec::new()).worker_count(), 1);
    }

    #[tokio::test]
    async fn test_run_scan_sorted_and_bounded() {
        let scanner = MockScanner::new();
        let job = ScanJobConfig::new(ports(1..=64)).with_concurrency(7);

        let results = run_scan(&scanner, job).await;

        assert_eq!(results.len(), 64);
        assert!(results.windows(2).all(|w| w[0].port < w[1].port));
        assert!(scanner.peak.load(Ordering::SeqCst) <= 7);
        assert!(results.iter().all(|r| r.open == (r.port % 2 == 0)));
    }

    #[tokio::test]
    async fn test_scan_closed_ports() {
        let mut closed = Vec::new();
        for _ in 0..3 {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            closed.push(listener.local_addr().unwrap().port());
        }

        let results = scan("127.0.0.1", Some(closed.as_slice()), Duration::from_millis(300), 30).await;

        assert_eq!(results.len(), closed.len());
        for r in &results {
            assert!(!r.open);
            assert!(r.banner.is_empty());
        }
    }

    #[tokio::test]
    async fn test_scan_dedups_and_sorts_input() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open_port = listener.local_addr().unwrap().port();
        let requested = [open_port, 0, open_port, 1];

        let results = scan(
            "127.0.0.1",
            Some(&requested[..]),
            Duration::from_millis(200),
            DEFAULT_MAX_CONCURRENCY,
        )
        .await;

        let got: Vec<u16> = results.iter().map(|r| r.port).collect();
        let mut expected = vec![1, open_port];
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(got, expected);
        drop(listener);
    }

    #[tokio::test]
    async fn test_scan_open_state_is_stable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let first = scan("127.0.0.1", Some(&[port][..]), Duration::from_millis(200), 30).await;
        let second = scan("127.0.0.1", Some(&[port][..]), Duration::from_millis(200), 30).await;

        assert!(first[0].open);
        assert_eq!(first[0].open, second[0].open);
        drop(listener);
    }

    #[tokio::test]
    async fn test_scan_defaults_to_common_ports() {
        let results = scan("127.0.0.1", None, Duration::from_millis(200), 30).await;
        let got: Vec<u16> = results.iter().map(|r| r.port).collect();
        assert_eq!(got, DEFAULT_PORTS.to_vec());

        let results = scan("127.0.0.1", Some(&[][..]), Duration::from_millis(200), 30).await;
        assert_eq!(results.len(), DEFAULT_PORTS.len());
    }
}
