//! Upstream provider clients.
//!
//! One submodule per API: `newsapi` (aggregator), `guardian` (editorial),
//! `nyt` (wire-service archive). Each owns its base endpoint, credential,
//! typed request parameters, raw response schema, and a total
//! normalization function into the canonical [`crate::model::Article`].
//!
//! Requests fail once — no retries at this layer. Callers decide whether
//! a failure is isolated (aggregated search) or surfaced (feed).
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub mod guardian;
pub mod newsapi;
pub mod nyt;

pub use guardian::GuardianClient;
pub use newsapi::NewsApiClient;
pub use nyt::NytClient;

/// Maximum response body size (5 MB).
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// The three upstream providers, in fixed aggregation precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    NewsApi,
    Guardian,
    Nyt,
}

impl ProviderKind {
    /// Human-readable label, used in logs.
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::NewsApi => "NewsAPI",
            ProviderKind::Guardian => "Guardian",
            ProviderKind::Nyt => "NYT",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from a single provider request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request exceeded the per-provider timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Response body was not valid JSON for the expected schema
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Issue a GET request and decode the JSON response.
///
/// Wraps the whole send in `timeout`; non-2xx statuses and oversized
/// bodies are errors. This is the single network entry point for all
/// three provider clients.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<T, ProviderError> {
    let response = tokio::time::timeout(timeout, http.get(url).query(query).send())
        .await
        .map_err(|_| ProviderError::Timeout(timeout.as_secs()))??;

    if !response.status().is_success() {
        return Err(ProviderError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_BODY_SIZE).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ProviderError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ProviderError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ProviderError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ProviderError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

// ============================================================================
// Date Shaping
// ============================================================================

/// Truncate an ISO-8601 timestamp to its calendar date (`2024-01-15`).
pub(crate) fn calendar_date(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

/// Calendar date with the separators removed (`20240115`), as the
/// wire-service archive expects.
pub(crate) fn compact_date(value: &str) -> String {
    calendar_date(value).replace('-', "")
}

/// Empty → `None`, otherwise the calendar date.
pub(crate) fn date_param(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(calendar_date(value).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_date_strips_time_component() {
        assert_eq!(calendar_date("2024-01-15T08:30:00Z"), "2024-01-15");
        assert_eq!(calendar_date("2024-01-15"), "2024-01-15");
        assert_eq!(calendar_date(""), "");
    }

    #[test]
    fn test_compact_date_removes_separators() {
        assert_eq!(compact_date("2024-01-15T08:30:00Z"), "20240115");
        assert_eq!(compact_date("2024-01-15"), "20240115");
    }

    #[test]
    fn test_date_param_empty_is_unconstrained() {
        assert_eq!(date_param(""), None);
        assert_eq!(date_param("2024-01-15T08:30:00Z"), Some("2024-01-15".to_string()));
    }

    #[test]
    fn test_provider_labels() {
        assert_eq!(ProviderKind::NewsApi.label(), "NewsAPI");
        assert_eq!(ProviderKind::Guardian.label(), "Guardian");
        assert_eq!(ProviderKind::Nyt.label(), "NYT");
    }
}
