//! Analysis service trait and its HTTP implementation.

use crate::error::{CheckError, Result};
use crate::http::{build_http_client, endpoint_url, error_detail, transport_error};
use crate::types::{CheckRequest, CheckResponse};
use async_trait::async_trait;
use icu_core::BackendConfig;
use reqwest::Client;
use std::time::Duration;

/// Path of the analysis endpoint under the service base URL.
pub const CHECK_PATH: &str = "/api/privacy-check";

/// Trait for services that run a privacy exposure analysis.
///
/// Implementations must be thread-safe (Send + Sync) so a controller can be
/// shared across tasks.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Run one analysis.
    ///
    /// # Errors
    /// Returns error on non-2xx answers, transport failures or undecodable bodies.
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse>;

    /// Short identifier used in logs.
    fn backend_id(&self) -> &str;
}

/// Analysis service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalysisBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAnalysisBackend {
    /// Create a backend with default settings for the given base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let defaults = BackendConfig::default();
        Self::with_settings(base_url, defaults.timeout(), &defaults.user_agent)
    }

    /// Create a backend from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::with_settings(config.base_url.clone(), config.timeout(), &config.user_agent)
    }

    /// Create a backend with an explicit timeout and user agent.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_settings(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = build_http_client(timeout, user_agent)
            .map_err(|e| CheckError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Full URL of the analysis endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        endpoint_url(&self.base_url, CHECK_PATH)
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Api {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e, self.timeout))?;

        serde_json::from_slice(&body)
            .map_err(|e| CheckError::InvalidResponse(format!("failed to parse response: {e}")))
    }

    fn backend_id(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_creation() {
        let backend = HttpAnalysisBackend::new("http://localhost:8001").expect("create backend");
        assert_eq!(backend.backend_id(), "http");
        assert_eq!(backend.endpoint(), "http://localhost:8001/api/privacy-check");
        assert_eq!(backend.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_backend_from_config() {
        let config = BackendConfig {
            base_url: "https://icu.example.org/".to_string(),
            timeout_secs: 5,
            ..BackendConfig::default()
        };
        let backend = HttpAnalysisBackend::from_config(&config).expect("create backend");
        assert_eq!(backend.endpoint(), "https://icu.example.org/api/privacy-check");
        assert_eq!(backend.timeout, Duration::from_secs(5));
    }
}
