//! Scan subcommand implementation.
//!
//! Handles the `reconscan scan <target>` command for port scanning.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::detect::TechDetector;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::report::ReconReport;
use crate::scanner::{run_scan, ScanConfig, ScanJobConfig, TcpConnectScanner};
use crate::types::{parse_port_list, ScanTarget};
use clap::Parser;
use std::time::Duration;

/// Scan a target for open ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target to scan (IP address or hostname)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan, separated by commas, semicolons or spaces
    /// (e.g. "22,80,443", "8000-8010"). Defaults to 25 common ports.
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Maximum number of concurrent port scans
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Connect timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Skip banner grabbing on open ports
    #[arg(long)]
    pub no_banner: bool,

    /// Run technology detection on the scan results
    #[arg(long)]
    pub tech: bool,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let host = self.target.trim();
        if host.is_empty() {
            return Err(CliError::Other("target must not be empty".to_string()));
        }

        let format = OutputFormat::resolve(self.output, settings);
        let target = self.build_target(host, quiet);
        let timeout = self
            .timeout
            .map(Duration::from_millis)
            .unwrap_or_else(|| settings.connect_timeout());
        let concurrency = self.concurrency.unwrap_or(settings.concurrency);

        if !quiet && format == OutputFormat::Plain {
            output::print_scan_header(target.host(), target.ports().len(), self.tech);
        }

        let report = ReconReport::new(host);

        let mut config = ScanConfig::new(host)
            .with_timeout(timeout)
            .with_strategies(settings.strategy_map());
        if self.no_banner {
            config = config.without_banners();
        }
        let scanner = TcpConnectScanner::new(config);

        let mut job = ScanJobConfig::from_target(&target).with_concurrency(concurrency);
        if verbose {
            job = job.with_verbose();
        }
        let results = run_scan(&scanner, job).await;

        let report = if self.tech {
            let detector = TechDetector::new(settings.detector_config())?;
            let tech = detector.detect(host, Some(results.as_slice())).await;
            report.with_ports(results).with_tech(tech)
        } else {
            report.with_ports(results)
        };

        let report = report.finalize();
        output::print_report(&report, format)?;
        if verbose && format == OutputFormat::Plain {
            output::print_info(&report.summary());
        }
        Ok(())
    }

    fn build_target(&self, host: &str, quiet: bool) -> ScanTarget {
        let Some(list) = &self.ports else {
            return ScanTarget::with_default_ports(host);
        };
        match parse_port_list(list) {
            Some(ports) => ScanTarget::from_ports(host, ports),
            None => {
                if !quiet {
                    output::print_warning(&format!(
                        "no valid ports in '{list}', scanning the default set"
                    ));
                }
                ScanTarget::with_default_ports(host)
            }
        }
    }
}
