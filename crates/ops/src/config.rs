//! Configuration for the operations layer.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::OpsError;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Configuration for connecting to an Evently backend.
#[derive(Debug, Clone)]
pub struct OpsConfig {
    /// Backend endpoint URL (e.g. `http://localhost:5000`).
    pub endpoint: String,
    /// Request timeout. `None` leaves the transport defaults in place.
    pub timeout: Option<Duration>,
}

/// On-disk shape of the TOML configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl OpsConfig {
    /// Create a new configuration with defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `EVENTLY_ENDPOINT` (defaults to `http://localhost:5000`)
    /// - `EVENTLY_TIMEOUT_SECS` (optional, no timeout when unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup, applying the same rules
    /// as [`from_env`](Self::from_env).
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("EVENTLY_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let timeout = lookup("EVENTLY_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self { endpoint, timeout }
    }

    /// Parse configuration from a TOML document.
    ///
    /// ```toml
    /// endpoint = "https://events.example.com"
    /// timeout_secs = 60
    /// ```
    ///
    /// Missing keys fall back to the defaults; unknown keys are rejected.
    pub fn from_toml_str(content: &str) -> Result<Self, OpsError> {
        let file: FileConfig =
            toml::from_str(content).map_err(|e| OpsError::Configuration(e.to_string()))?;

        Ok(Self {
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: file.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OpsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OpsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
