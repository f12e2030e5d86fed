use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read gateway configuration from environment: {0}")]
    Env(#[from] serde_env::Error),

    #[error("GW_URL must not be empty")]
    EmptyBaseUrl,
}

/// Raw environment shape: `GW_URL`, `GW_TIMEOUT_MS`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    gw_url: String,
    gw_timeout_ms: Option<u64>,
}

/// Settings for [`crate::HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Origin every relative target is resolved against, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `GW_URL` (required) and `GW_TIMEOUT_MS` (optional) from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_raw(serde_env::from_env()?)
    }

    /// Same as [`Self::from_env`] over an explicit set of variables.
    pub fn from_vars<I, S>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        Self::from_raw(serde_env::from_iter(vars)?)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = raw.gw_url.trim().to_owned();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let timeout = raw
            .gw_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self { base_url, timeout })
    }
}
