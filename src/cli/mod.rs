//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `reconscan scan <target>` - Scan ports, optionally followed by detection
//! - `reconscan tech <target>` - Detect web technologies without a port scan

mod scan;
mod tech;

pub use scan::ScanCommand;
pub use tech::TechCommand;

use crate::config::AppSettings;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// reconscan - TCP port scanner and web technology detector.
///
/// Scans a host for open TCP ports, grabs service banners, and guesses the
/// software behind them from banners and HTTP(S) responses.
#[derive(Parser, Debug)]
#[command(name = "reconscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Port scanner, banner grabber and technology detector", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show a progress bar and debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, global = true, value_name = "PATH", env = "RECONSCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a target for open ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Detect web technologies on a target
    #[command(alias = "t")]
    Tech(TechCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV rows of port results
    Csv,
}

impl OutputFormat {
    /// The explicit choice, or the settings default, or plain text.
    pub fn resolve(explicit: Option<Self>, settings: &AppSettings) -> Self {
        explicit
            .or_else(|| Self::from_str(&settings.default_output_format, true).ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
