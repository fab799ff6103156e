//! Engine configuration.
//!
//! Provides the configuration consumed by the API client, the local store
//! and the background sync service: server URL (with env override), bearer
//! token, request timeout, snapshot location and sync poll interval.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default server URL
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Deadline for a single API call before the engine falls back to the cache.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the background service re-checks the pending backlog.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    api_url: String,
    token: Option<String>,
    owner_id: i64,
    request_timeout: Duration,
    poll_interval: Duration,
    data_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let api_url =
            std::env::var("JOBSYNC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("jobsync");
        Self {
            api_url,
            token: None,
            owner_id: 0,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            data_dir,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an [`EngineConfigBuilder`].
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Set the bearer token used for API calls.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Clear the token (logout).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the full URL for an API endpoint.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    pub fn base_url(&self) -> &str {
        &self.api_url
    }

    /// Owner id stamped onto clients synthesized offline.
    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the local snapshot database.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("cache.db")
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    api_url: Option<String>,
    token: Option<String>,
    owner_id: Option<i64>,
    request_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    data_dir: Option<PathBuf>,
}

impl EngineConfigBuilder {
    /// Set the server URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the owner id stamped onto offline-created clients.
    pub fn owner_id(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Set the per-request deadline before cache fallback.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the background poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set the directory holding the snapshot database.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating the server URL.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let api_url = self.api_url.unwrap_or(defaults.api_url);
        reqwest::Url::parse(&api_url).map_err(|_| ConfigError::InvalidUrl(api_url.clone()))?;
        Ok(EngineConfig {
            api_url,
            token: self.token,
            owner_id: self.owner_id.unwrap_or(defaults.owner_id),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
