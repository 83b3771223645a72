//! Report generation service trait and its HTTP implementation.

use crate::error::{ExportError, Result};
use crate::format::ReportFormat;
use async_trait::async_trait;
use icu_check::http::{build_http_client, endpoint_url, error_detail};
use icu_check::CheckResult;
use icu_core::{BackendConfig, InputKind};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Path of the report endpoint under the service base URL.
pub const REPORT_PATH: &str = "/api/generate-report";

/// Body sent to the report service. Lives for a single export call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest<'a> {
    /// Result being reported on
    pub results: &'a CheckResult,
    /// Requested artifact format
    pub format: ReportFormat,
    /// Kind of identifier that was checked
    pub input_type: InputKind,
    /// Identifier that was checked
    pub input_value: &'a str,
}

/// Trait for services that render a report artifact.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Render the report and return the artifact bytes.
    ///
    /// # Errors
    /// Returns [`ExportError::ReportGeneration`] if the service fails or is unreachable.
    async fn generate(&self, request: &ReportRequest<'_>) -> Result<Vec<u8>>;
}

/// Report service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReportService {
    client: Client,
    base_url: String,
}

impl HttpReportService {
    /// Create a service client with default settings for the given base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let defaults = BackendConfig::default();
        Self::with_settings(base_url, defaults.timeout(), &defaults.user_agent)
    }

    /// Create a service client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::with_settings(config.base_url.clone(), config.timeout(), &config.user_agent)
    }

    /// Create a service client with an explicit timeout and user agent.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_settings(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = build_http_client(timeout, user_agent)
            .map_err(|e| ExportError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL of the report endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        endpoint_url(&self.base_url, REPORT_PATH)
    }
}

fn unreachable_service(err: &reqwest::Error) -> ExportError {
    ExportError::ReportGeneration {
        status: None,
        message: err.to_string(),
    }
}

#[async_trait]
impl ReportService for HttpReportService {
    async fn generate(&self, request: &ReportRequest<'_>) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| unreachable_service(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::ReportGeneration {
                status: Some(status.as_u16()),
                message: error_detail(&body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| unreachable_service(&e))?;

        Ok(bytes.to_vec())
    }
}
