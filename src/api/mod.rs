//! REST API Client
//!
//! Thin async wrapper over the CRM backend's JSON endpoints, one method per
//! endpoint. No caching and no retries live here — the offline layer decides
//! what to do when a call fails. Every request carries the configured bearer
//! token (when present) and the explicit timeout from [`EngineConfig`], so a
//! hung connection turns into a fallback instead of an indefinite wait.

pub mod clients;
pub mod followups;
pub mod notes;
mod wire;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::ApiError;

/// HTTP client for the CRM backend.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: EngineConfig,
}

impl ApiClient {
    /// Build a client from the engine configuration.
    pub fn new(config: EngineConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    /// Start a request against an API path, attaching auth when configured.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        debug!(%method, %url, "api request");
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.config.token() {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%status, "api request failed");
            return Err(ApiError::Status { status, body });
        }
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "api response did not decode");
            ApiError::Decode(e.to_string())
        })
    }

    /// Send a request where the response body does not matter.
    async fn execute_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            warn!(%status, "api request failed");
            return Err(ApiError::Status { status, body });
        }
        Ok(())
    }
}
