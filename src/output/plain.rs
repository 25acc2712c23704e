//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::detect::TechnologyReport;
use crate::http::HttpProbeResult;
use crate::report::ReconReport;
use crate::scanner::PortResult;
use console::{style, Style};
use std::io::{self, Write};

/// Banners longer than this many characters are cut for display.
pub const MAX_BANNER_DISPLAY: usize = 300;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write the report in human-readable form.
pub fn write_plain<W: Write>(out: &mut W, report: &ReconReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                {} Results", style("reconscan").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(
        out,
        "  {} {}",
        style("Started:").bold(),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        out,
        "  {} {:.2}s",
        style("Duration:").bold(),
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(out)?;

    if let Some(ports) = &report.ports {
        write_ports(out, ports)?;
    }
    if let Some(tech) = &report.tech {
        write_tech(out, tech)?;
    }

    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;
    Ok(())
}

fn write_ports<W: Write>(out: &mut W, ports: &[PortResult]) -> io::Result<()> {
    let open = ports.iter().filter(|r| r.open).count();
    writeln!(
        out,
        "  {} {} ports scanned, {} open",
        style("Ports:").bold(),
        ports.len(),
        style(open).green().bold()
    )?;

    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(
        out,
        "  {:>6}  {:<15}  {}",
        style("PORT").bold(),
        style("STATE").bold(),
        style("BANNER").bold()
    )?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for result in ports {
        let (state, state_style) = if result.open {
            ("open", Style::new().green().bold())
        } else {
            ("closed/filtered", Style::new().red())
        };
        let banner = truncate_chars(&single_line(&result.banner), MAX_BANNER_DISPLAY);
        writeln!(
            out,
            "  {:>6}  {:<15}  {}",
            result.port,
            state_style.apply_to(state),
            style(banner).dim()
        )?;
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(out)?;
    Ok(())
}

fn write_tech<W: Write>(out: &mut W, tech: &TechnologyReport) -> io::Result<()> {
    writeln!(out, "  {}", style("Technologies:").bold())?;
    if tech.guesses.is_empty() {
        writeln!(out, "    {}", style("none detected").dim())?;
    }
    for guess in &tech.guesses {
        let marker = if tech.banner_matches.contains(guess) {
            " (banner)"
        } else {
            ""
        };
        writeln!(out, "    {} {}{}", style("•").dim(), style(guess).yellow(), marker)?;
    }
    writeln!(out)?;

    if !tech.http_probes.is_empty() {
        writeln!(out, "  {}", style("HTTP probes:").bold())?;
        for probe in &tech.http_probes {
            match probe {
                HttpProbeResult::Response {
                    url,
                    status_code,
                    headers,
                    ..
                } => {
                    let server = headers.get("server").map(String::as_str).unwrap_or("-");
                    writeln!(
                        out,
                        "    {} {} (server: {})",
                        url,
                        style(status_code).green(),
                        server
                    )?;
                }
                HttpProbeResult::Failed { url, .. } => {
                    writeln!(out, "    {} {}", url, style("request failed").red())?;
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print a short header before scanning begins.
pub fn print_scan_header(host: &str, ports: usize, tech: bool) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("reconscan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Target: {}", style("•").dim(), style(host).white().bold());
    println!(
        "{} Scanning {} ports...",
        style("•").dim(),
        style(ports).white().bold()
    );
    if tech {
        println!("{} Technology detection enabled", style("•").dim());
    }
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate to at most `max_chars` characters, adding an ellipsis if cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...", &s[..idx]),
    }
}

/// Banners often span lines; show them on one.
fn single_line(s: &str) -> String {
    s.split(['\r', '\n']).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" | ")
}
