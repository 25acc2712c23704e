//! # reconscan - Port Scanner, Banner Grabber and Technology Detector
//!
//! reconscan probes a single host: it checks a set of TCP ports with
//! bounded parallelism, grabs a banner from every open port, and guesses
//! the software behind them from banners and HTTP(S) responses.
//!
//! ## Features
//!
//! - **Concurrent TCP Connect Scanning**: Async I/O with a bounded worker count
//! - **Banner Grabbing**: Plain reads, HTTP `HEAD`, and TLS with a certificate fallback
//! - **HTTP Fingerprinting**: Status, headers, and the start of the body
//! - **Technology Detection**: Table-driven signatures over banners, headers, and HTML
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! TLS certificate and hostname validation are disabled for every probe.
//! Only scan hosts you are authorized to test.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use reconscan::detect::{DetectorConfig, TechDetector};
//! use reconscan::scanner::{scan, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONCURRENCY};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ports = scan("scanme.example", Some(&[22u16, 80, 443][..]), DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONCURRENCY).await;
//!     for result in ports.iter().filter(|r| r.open) {
//!         println!("{} open: {}", result.port, result.banner);
//!     }
//!
//!     let detector = TechDetector::new(DetectorConfig::default())?;
//!     let report = detector.detect("scanme.example", Some(ports.as_slice())).await;
//!     println!("{:?}", report.guesses);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port newtype, port list parsing, scan targets
//! - [`scanner`] - Connector, the `Scanner` trait, and bounded-parallel scanning
//! - [`banner`] - Banner Prober with per-port strategies
//! - [`http`] - HTTP(S) fingerprint prober
//! - [`detect`] - Signature tables and the technology detector
//! - [`report`] - Caller-owned aggregate of one run
//! - [`config`] - Settings file management
//! - [`output`] - Output formatting utilities
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod http;
pub mod output;
pub mod report;
pub mod scanner;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use detect::{TechDetector, TechnologyReport};
pub use error::{CliError, ConfigError, ScanError};
pub use http::{HttpProbeResult, HttpProber};
pub use report::ReconReport;
pub use scanner::{PortResult, Scanner};
pub use types::{Port, ScanTarget};
