//! Error type for calls to the ask service

use thiserror::Error;

/// Why a question did not produce an answer
#[derive(Debug, Error)]
pub enum AskError {
    /// The user aborted the request before it resolved
    #[error("request cancelled")]
    Cancelled,

    /// The service answered with a non-2xx status
    #[error("service returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not the expected JSON shape
    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl AskError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AskError::Cancelled)
    }
}

pub type AskResult<T> = std::result::Result<T, AskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_cancelled_is_cancelled() {
        assert!(AskError::Cancelled.is_cancelled());
        let status = AskError::Status {
            status: 500,
            detail: "boom".into(),
        };
        assert!(!status.is_cancelled());
        assert!(!AskError::Decode("bad".into()).is_cancelled());
    }

    #[test]
    fn test_status_display_includes_detail() {
        let err = AskError::Status {
            status: 400,
            detail: "Question cannot be empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "service returned 400: Question cannot be empty"
        );
    }
}
