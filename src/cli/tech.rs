//! Tech subcommand implementation.
//!
//! Handles `reconscan tech <target>`: technology detection without a prior
//! port scan, so the bare host is probed over HTTP and HTTPS.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::detect::TechDetector;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::report::ReconReport;
use clap::Parser;
use std::time::Duration;

/// Detect web technologies on a target.
#[derive(Parser, Debug)]
pub struct TechCommand {
    /// Target host (IP address or hostname)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Timeout for each HTTP(S) probe in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl TechCommand {
    /// Execute the tech command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let host = self.target.trim();
        if host.is_empty() {
            return Err(CliError::Other("target must not be empty".to_string()));
        }

        let format = OutputFormat::resolve(self.output, settings);
        if !quiet && format == OutputFormat::Plain {
            output::print_info(&format!("Detecting technologies on {host}..."));
        }

        let mut config = settings.detector_config();
        if let Some(ms) = self.timeout {
            config = config.with_timeout(Duration::from_millis(ms));
        }

        let report = ReconReport::new(host);
        let detector = TechDetector::new(config)?;
        let tech = detector.detect(host, None).await;

        let report = report.with_tech(tech).finalize();
        output::print_report(&report, format)?;
        if verbose && format == OutputFormat::Plain {
            output::print_info(&report.summary());
        }
        Ok(())
    }
}
