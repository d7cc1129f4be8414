//! Wire types for the ask service
//!
//! `POST /ask` takes `{question, top_k?}` and answers with
//! `{answer, sources, response_time?}`. Errors come back as `{detail}`.

use serde::{Deserialize, Serialize};

/// Request body for `POST /ask`
#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

/// A document the answer was drawn from, with its retrieval score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub source: String,
    pub score: f64,
}

/// Response body from `POST /ask`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Server-side processing time in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

/// Response body from `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_unset_top_k() {
        let request = AskRequest {
            question: "What are the hostel fees?",
            top_k: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"question": "What are the hostel fees?"}));

        let request = AskRequest {
            question: "q",
            top_k: Some(3),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["top_k"], 3);
    }

    #[test]
    fn test_response_without_sources() {
        let resp: AskResponse = serde_json::from_str(r#"{"answer": "Hi"}"#).unwrap();
        assert_eq!(resp.answer, "Hi");
        assert!(resp.sources.is_empty());
        assert!(resp.response_time.is_none());
    }

    #[test]
    fn test_response_with_sources() {
        let resp: AskResponse = serde_json::from_str(
            r#"{
                "answer": "**Fees** are listed below",
                "sources": [{"source": "fees.pdf", "score": 0.812}],
                "response_time": 1.42
            }"#,
        )
        .unwrap();
        assert_eq!(resp.sources.len(), 1);
        assert_eq!(resp.sources[0].source, "fees.pdf");
        assert_eq!(resp.response_time, Some(1.42));
    }

    #[test]
    fn test_health_status() {
        let ok: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "version": "2.1"}"#).unwrap();
        assert!(ok.is_healthy());
        assert_eq!(ok.version.as_deref(), Some("2.1"));

        let bad: HealthStatus =
            serde_json::from_str(r#"{"status": "unhealthy", "error": "qdrant down"}"#).unwrap();
        assert!(!bad.is_healthy());
    }
}
