//! HTTP client for the ask service

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::types::{AskRequest, AskResponse, ErrorBody, HealthStatus};
use crate::error::{AskError, AskResult};

/// Anything that can answer a question.
///
/// The chat controller only talks to this trait, so it can be driven by a
/// fake in tests.
#[async_trait]
pub trait Asker: Send + Sync {
    async fn ask(&self, question: &str) -> AskResult<AskResponse>;
}

/// reqwest-backed client for `POST /ask` and `GET /health`
#[derive(Debug, Clone)]
pub struct AskClient {
    http: reqwest::Client,
    base: Url,
    top_k: Option<u32>,
}

impl AskClient {
    /// Create a client rooted at `endpoint` (e.g. `http://localhost:10000`)
    pub fn new(endpoint: &str) -> AskResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: parse_base(endpoint)?,
            top_k: None,
        })
    }

    /// Apply a whole-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> AskResult<Self> {
        self.http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Number of documents the service should retrieve per question
    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// Query the service health endpoint
    pub async fn health(&self) -> AskResult<HealthStatus> {
        let url = self.url("health")?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| AskError::Decode(e.to_string()))
    }

    fn url(&self, path: &str) -> AskResult<Url> {
        self.base
            .join(path)
            .map_err(|e| AskError::InvalidEndpoint(e.to_string()))
    }
}

#[async_trait]
impl Asker for AskClient {
    async fn ask(&self, question: &str) -> AskResult<AskResponse> {
        let url = self.url("ask")?;
        let request = AskRequest {
            question,
            top_k: self.top_k,
        };

        debug!(%url, chars = question.len(), "posting question");
        let response = self.http.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = status_error(status, &body);
            warn!("ask failed: {}", err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            AskError::Decode(format!("{}. Response preview: {}", e, preview))
        })
    }
}

/// Parse the endpoint, making sure relative joins stay under its path
fn parse_base(endpoint: &str) -> AskResult<Url> {
    let mut base = Url::parse(endpoint.trim())
        .map_err(|e| AskError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(AskError::InvalidEndpoint(format!(
            "{}: unsupported scheme {}",
            endpoint,
            base.scheme()
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Build a `Status` error, preferring the service's `{detail}` message
fn status_error(status: StatusCode, body: &str) -> AskError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .ok()
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    AskError::Status {
        status: status.as_u16(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_gets_trailing_slash() {
        let client = AskClient::new("http://localhost:10000").unwrap();
        assert_eq!(client.url("ask").unwrap().as_str(), "http://localhost:10000/ask");

        let client = AskClient::new("https://example.com/api").unwrap();
        assert_eq!(
            client.url("ask").unwrap().as_str(),
            "https://example.com/api/ask"
        );
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        assert!(matches!(
            AskClient::new("not a url"),
            Err(AskError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            AskClient::new("ftp://example.com"),
            Err(AskError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_status_error_prefers_detail() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Question too long (max 500 characters)"}"#,
        );
        match err {
            AskError::Status { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Question too long (max 500 characters)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_falls_back_to_reason() {
        match status_error(StatusCode::BAD_GATEWAY, "   ") {
            AskError::Status { detail, .. } => assert_eq!(detail, "Bad Gateway"),
            other => panic!("unexpected error: {:?}", other),
        }
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") {
            AskError::Status { detail, .. } => assert_eq!(detail, "upstream exploded"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
