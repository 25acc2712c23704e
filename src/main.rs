//! reconscan command-line entry point.

use anyhow::Result;
use clap::Parser;
use reconscan::cli::{Cli, Commands};
use reconscan::config::AppSettings;
use reconscan::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = AppSettings::resolve(cli.config.as_deref())?;

    match &cli.command {
        Commands::Scan(cmd) => cmd.execute(&settings, cli.verbose, cli.quiet).await?,
        Commands::Tech(cmd) => cmd.execute(&settings, cli.verbose, cli.quiet).await?,
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise the flags pick the level. Logs go to stderr.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reconscan={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
