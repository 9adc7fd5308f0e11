//! Client configuration.
//!
//! Only the API location and transport timeout live here. Credentials are
//! not configuration: each call receives an `AuthContext`.

use url::Url;

/// Default API base when `FOLIO_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default transport timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for the platform API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://learn.example/api`. Paths are appended to it.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Configuration for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL does not parse or cannot
    /// carry a path.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base("base_url", base_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `FOLIO_API_URL` (default: `http://localhost:5000/api`)
    /// - `FOLIO_TIMEOUT_SECS` (default: 20)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("FOLIO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Ok(Self {
            base_url: parse_base("FOLIO_API_URL", &raw)?,
            timeout_secs: std::env::var("FOLIO_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Configuration pointing at a local server (for testing).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        let mut config = Self::new(&format!("http://127.0.0.1:{port}/api"))?;
        config.timeout_secs = 5;
        Ok(config)
    }

    /// Override the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn parse_base(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            source.to_string(),
            "URL cannot carry a path".to_string(),
        ));
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
