//! HTTP clients for the tracker (REST and GraphQL) and the published sheets.

pub mod graphql;
pub mod sheets;
pub mod shikimori;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::TrackerConfig;

/// Failure of a single remote request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("GraphQL errors: {0}")]
    Graphql(String),
}

impl FetchError {
    /// Status code of a non-success response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds the shared HTTP client with the tracker's user agent and the
/// configured timeout.
pub fn build_http_client(config: &TrackerConfig) -> Result<Client, FetchError> {
    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()?;
    Ok(client)
}

/// Turns a non-success response into [`FetchError::Status`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(FetchError::Status {
        status: status.as_u16(),
        body: truncate(&body, 200),
    })
}

pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

pub(crate) fn count_request(source: &'static str) {
    metrics::counter!("remote_requests_total", "source" => source).increment(1);
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_code() {
        let err = FetchError::Status {
            status: 429,
            body: "Retry later".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("429"));
        assert_eq!(FetchError::Decode("x".into()).status(), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("абвгд", 2), "аб…");
    }
}
