//! Client configuration

use std::path::PathBuf;

/// Configuration for connecting to the field-sales backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Bearer token for authenticated calls
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Directory holding the local fallback store
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new configuration with defaults for everything but the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: 30,
            data_dir: PathBuf::from("./fieldforce-data"),
        }
    }

    /// Load configuration from environment variables, with defaults:
    /// - `FIELDFORCE_API_URL` (default `http://localhost:8080/api`)
    /// - `FIELDFORCE_TOKEN`
    /// - `FIELDFORCE_TIMEOUT_SECS` (default 30)
    /// - `FIELDFORCE_DATA_DIR` (default `./fieldforce-data`)
    pub fn from_env() -> Self {
        let base_url = std::env::var("FIELDFORCE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());
        let token = std::env::var("FIELDFORCE_TOKEN").ok();
        let timeout_secs = std::env::var("FIELDFORCE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        let data_dir = std::env::var("FIELDFORCE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./fieldforce-data"));

        Self {
            base_url,
            token,
            timeout_secs,
            data_dir,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the local store directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
