//! JSON output formatting.

use crate::report::ReconReport;
use std::io::{self, Write};

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &ReconReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PortResult;
    use crate::types::Port;

    #[test]
    fn test_write_json() {
        let report = ReconReport::new("example.com")
            .with_ports(vec![PortResult::open(Port::new(22).unwrap(), "SSH-2.0")]);
        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["target"], "example.com");
        assert_eq!(value["ports"][0]["banner"], "SSH-2.0");
    }
}
