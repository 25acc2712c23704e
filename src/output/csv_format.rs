//! CSV output formatting.

use crate::report::ReconReport;
use std::io::Write;

/// Write one `port,state,banner` row per scanned port.
///
/// A report without port results yields only the header row.
pub fn write_csv<W: Write>(out: &mut W, report: &ReconReport) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "state", "banner"])?;
    for result in report.ports.iter().flatten() {
        let state = if result.open { "open" } else { "closed" };
        wtr.write_record([result.port.to_string().as_str(), state, result.banner.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
