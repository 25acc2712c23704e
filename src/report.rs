//! Aggregate result of one reconnaissance run.
//!
//! A `ReconReport` is built and owned by the caller; nothing is kept
//! between invocations.

use crate::detect::TechnologyReport;
use crate::scanner::PortResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Port scan and/or technology detection results for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconReport {
    /// Host as given by the user.
    pub target: String,
    /// When the run started.
    pub generated_at: DateTime<Utc>,
    /// Total wall time in milliseconds.
    pub duration_ms: u64,
    /// Port results, sorted by port, when a scan was run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<PortResult>>,
    /// Technology detection results, when detection was run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech: Option<TechnologyReport>,
}

impl ReconReport {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            generated_at: Utc::now(),
            duration_ms: 0,
            ports: None,
            tech: None,
        }
    }

    pub fn with_ports(mut self, ports: Vec<PortResult>) -> Self {
        self.ports = Some(ports);
        self
    }

    pub fn with_tech(mut self, tech: TechnologyReport) -> Self {
        self.tech = Some(tech);
        self
    }

    /// Stamp the elapsed time since `generated_at`.
    pub fn finalize(mut self) -> Self {
        let elapsed = Utc::now() - self.generated_at;
        self.duration_ms = elapsed.num_milliseconds().max(0) as u64;
        self
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &PortResult> {
        self.ports.iter().flatten().filter(|r| r.open)
    }

    /// One-line summary, e.g. `example.com - 3/25 open, 2 technologies [1.20s]`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ports) = &self.ports {
            parts.push(format!("{}/{} open", self.open_ports().count(), ports.len()));
        }
        if let Some(tech) = &self.tech {
            parts.push(format!("{} technologies", tech.guesses.len()));
        }
        format!(
            "{} - {} [{:.2}s]",
            self.target,
            parts.join(", "),
            self.duration_ms as f64 / 1000.0
        )
    }
}
