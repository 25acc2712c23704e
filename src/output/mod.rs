//! Output formatting module.
//!
//! Renders a [`ReconReport`] as plain text, JSON, or CSV. Renderers write to
//! any `io::Write`; the `print_*` helpers target stdout.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    print_error, print_info, print_scan_header, print_warning, truncate_chars, write_plain,
    MAX_BANNER_DISPLAY,
};

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::report::ReconReport;
use std::io::{self, Write};

/// Render `report` to `out` in the requested format.
pub fn write_report<W: Write>(out: &mut W, report: &ReconReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Plain => plain::write_plain(out, report)?,
        OutputFormat::Json => json_format::write_json(out, report)?,
        OutputFormat::Csv => csv_format::write_csv(out, report)?,
    }
    Ok(())
}

/// Render `report` to stdout.
pub fn print_report(report: &ReconReport, format: OutputFormat) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format)?;
    out.flush()?;
    Ok(())
}
