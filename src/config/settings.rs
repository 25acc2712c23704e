//! Application settings and paths.
//!
//! Manages the XDG-compliant location of the settings file.

use crate::banner::{ProbeStrategy, StrategyMap};
use crate::detect::DetectorConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::http::DEFAULT_USER_AGENT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/reconscan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "reconscan", "reconscan")
            .ok_or(ConfigError::DirectoryNotFound)?;
        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-port connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Maximum concurrent port scans.
    pub concurrency: usize,
    /// Timeout for each HTTP(S) fingerprint probe in milliseconds.
    pub http_timeout_ms: u64,
    /// Default output format.
    pub default_output_format: String,
    /// User agent sent with HTTP(S) probes.
    pub user_agent: String,
    /// Ports treated as plain HTTP on top of the built-in set.
    pub extra_http_ports: Vec<u16>,
    /// Ports treated as HTTPS on top of the built-in set.
    pub extra_tls_ports: Vec<u16>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 1500,
            concurrency: 30,
            http_timeout_ms: 4000,
            default_output_format: "plain".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_http_ports: Vec::new(),
            extra_tls_ports: Vec::new(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no settings file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Load from `path` if given, otherwise from the default location.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// Banner strategies: the defaults plus the configured extra ports.
    pub fn strategy_map(&self) -> StrategyMap {
        let map = self
            .extra_http_ports
            .iter()
            .fold(StrategyMap::default(), |m, &p| {
                m.with(p, ProbeStrategy::HttpProbe)
            });
        self.extra_tls_ports
            .iter()
            .fold(map, |m, &p| m.with(p, ProbeStrategy::TlsHttpProbe))
    }

    /// Detector settings with the configured timeout, user agent and extra ports.
    pub fn detector_config(&self) -> DetectorConfig {
        let defaults = DetectorConfig::default();
        let http_ports = defaults.http_ports.clone();
        let https_ports = defaults.https_ports.clone();
        defaults
            .with_timeout(self.http_timeout())
            .with_user_agent(&self.user_agent)
            .with_http_ports(http_ports.into_iter().chain(self.extra_http_ports.iter().copied()))
            .with_https_ports(https_ports.into_iter().chain(self.extra_tls_ports.iter().copied()))
    }
}
