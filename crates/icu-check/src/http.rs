//! HTTP plumbing shared by the analysis and report clients.

use crate::error::CheckError;
use reqwest::Client;
use std::time::Duration;

/// Build an HTTP client with the given request timeout and user agent.
///
/// # Errors
/// Returns error if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration, user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

/// Join a service base URL and an absolute API path.
#[must_use]
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull a readable message out of an error body.
///
/// FastAPI-style services answer `{"detail": "..."}`; anything else is
/// returned as-is, or replaced by a placeholder when blank.
#[must_use]
pub fn error_detail(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(serde_json::Value::String(detail)) = map.get("detail") {
            return detail.clone();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a transport-level `reqwest` failure to a [`CheckError`].
#[must_use]
pub fn transport_error(err: &reqwest::Error, timeout: Duration) -> CheckError {
    if err.is_timeout() {
        CheckError::Timeout { after: timeout }
    } else {
        CheckError::Network(err.to_string())
    }
}
