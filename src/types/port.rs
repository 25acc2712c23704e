//! Port types and port list normalization.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `parse_port_list` turns the free-form strings typed by users into a
//! normalized list, silently discarding tokens it cannot understand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ports probed when the caller does not supply any.
pub const DEFAULT_PORTS: [u16; 25] = [
    21, 22, 23, 25, 53, 80, 110, 139, 143, 161, 389, 443, 445, 465, 587, 636, 993, 995, 1433,
    1521, 3306, 3389, 5432, 5900, 8080,
];

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Create a new Port from a u16, returning None for port 0.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port == 0 {
            None
        } else {
            Some(Self(port))
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value.into()))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        u16::try_from(value)
            .ok()
            .and_then(Port::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
}

/// Parse a single token: either `"80"` or an inclusive range `"8000-8010"`.
pub fn parse_port_token(token: &str) -> Result<Vec<Port>, PortError> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start: Port = start.parse()?;
            let end: Port = end.parse()?;
            if start > end {
                return Err(PortError::InvalidRange(start.0, end.0));
            }
            Ok((start.0..=end.0).map(Port).collect())
        }
        None => Ok(vec![token.parse()?]),
    }
}

/// Normalize a free-form port list such as `"22, 80;443 8080"`.
///
/// Tokens are separated by commas, semicolons, or whitespace. Tokens that
/// are not ports (or ranges of ports) are dropped. The result is sorted and
/// deduplicated; `None` means nothing usable was supplied.
pub fn parse_port_list(input: &str) -> Option<Vec<Port>> {
    let mut ports: Vec<Port> = input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| match parse_port_token(token) {
            Ok(ports) => Some(ports),
            Err(e) => {
                tracing::debug!(token, error = %e, "Discarding port token.");
                None
            }
        })
        .flatten()
        .collect();

    ports.sort_unstable();
    ports.dedup();

    if ports.is_empty() {
        None
    } else {
        Some(ports)
    }
}

/// The default port set as validated ports.
pub fn default_ports() -> Vec<Port> {
    DEFAULT_PORTS.iter().copied().map(Port).collect()
}
