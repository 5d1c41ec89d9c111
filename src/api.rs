//! Backend HTTP client.
//!
//! A thin request/response wrapper around `reqwest` that normalizes every
//! failure into [`PosError`]: transport problems become `Network`, non-success
//! statuses become `Api` carrying the backend's `detail` message when the
//! error body has one. No retries, no caching.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::PosError;

/// Default timeout for backend requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the backend base URL:
/// - ensure a scheme is present (https, or http for localhost)
/// - strip trailing slashes
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Convert a `reqwest::Error` into a user-friendly message.
fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach backend at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid backend URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

/// Fallback message for a non-success status with no usable error body.
fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        404 => "Not found".to_string(),
        s if s >= 500 => format!("Backend server error (HTTP {s})"),
        s => format!("HTTP {s}"),
    }
}

/// Extract the backend's `detail` field from an error body, falling back to a
/// status-derived message. FastAPI-style validation errors arrive as an array
/// under `detail`; those are serialized compactly so the operator still sees
/// what was rejected.
fn extract_detail(status: StatusCode, body_text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body_text) {
        match json.get("detail") {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Null) | None => {}
            Some(other) => {
                return format!(
                    "{} ({})",
                    status_error(status),
                    serde_json::to_string(other).unwrap_or_default()
                );
            }
        }
    }
    status_error(status)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Request/response client for the catalog/cash/sales backend.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, PosError> {
        let base_url = normalize_base_url(base_url);
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| PosError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(ApiClient { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a request against the backend.
    ///
    /// `path` includes the leading slash, e.g. `/cash/current`. Returns the
    /// JSON body, or `Value::Null` for an empty success response.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, PosError> {
        let full_url = format!("{}{}", self.base_url, path);
        debug!(method = %method, path = %path, "backend request");

        let mut req = self.http.request(method, &full_url);
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| PosError::Network(friendly_error(&self.base_url, &e)))?;
        let status = resp.status();
        let body_text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(PosError::Api {
                status: status.as_u16(),
                detail: extract_detail(status, &body_text),
            });
        }

        if body_text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body_text).map_err(|e| PosError::Decode(e.to_string()))
    }
}
