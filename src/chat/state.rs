//! Chat state and its transitions
//!
//! `ChatState` owns the transcript, the draft, the in-flight flag and the
//! error banner. Every change goes through the methods here, so the whole
//! request lifecycle can be exercised without any I/O:
//!
//! 1. `submit()` validates the draft and appends a user message plus a bot
//!    placeholder, handing back a [`PendingAsk`].
//! 2. The caller performs the request.
//! 3. `resolve()` fills the placeholder with the answer, a "stopped" note,
//!    or the fallback error.

use tracing::{debug, info};
use uuid::Uuid;

use super::message::Message;
use crate::api::AskResponse;
use crate::error::AskError;

/// Placeholder text after the user cancels
pub const STOPPED_TEXT: &str = "Response stopped.";

/// Placeholder text after any non-cancellation failure
pub const FALLBACK_ERROR_TEXT: &str =
    "Sorry, I couldn't reach the server. Please check your connection and try again.";

/// Banner shown alongside the fallback text
pub const CONNECTION_ERROR_BANNER: &str =
    "Unable to connect to the server. Make sure the backend is running.";

/// A submitted question waiting for its answer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAsk {
    pub placeholder_id: Uuid,
    pub question: String,
}

#[derive(Debug, Default)]
pub struct ChatState {
    messages: Vec<Message>,
    draft: String,
    in_flight: bool,
    error: Option<String>,
    pending: Option<Uuid>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Current error banner, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Most recent bot message
    pub fn last_bot(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_bot())
    }

    /// Turn the draft into a question.
    ///
    /// Returns `None` without touching the transcript when the draft is
    /// blank or a request is already in flight. Length limits are the
    /// service's to enforce; a rejection comes back through `resolve`.
    pub fn submit(&mut self) -> Option<PendingAsk> {
        let question = self.draft.trim();
        if question.is_empty() {
            return None;
        }
        if self.in_flight {
            debug!("submit ignored, request already in flight");
            return None;
        }

        let question = question.to_string();
        let placeholder = Message::placeholder();
        let placeholder_id = placeholder.id;

        self.messages.push(Message::user(question.clone()));
        self.messages.push(placeholder);
        self.draft.clear();
        self.error = None;
        self.in_flight = true;
        self.pending = Some(placeholder_id);

        Some(PendingAsk {
            placeholder_id,
            question,
        })
    }

    /// Apply the outcome of a request to its placeholder.
    ///
    /// Outcomes for anything other than the pending placeholder are dropped.
    /// Returns whether the outcome was applied.
    pub fn resolve(&mut self, placeholder_id: Uuid, outcome: Result<AskResponse, AskError>) -> bool {
        if self.pending != Some(placeholder_id) {
            debug!(%placeholder_id, "dropping stale outcome");
            return false;
        }
        let Some(msg) = self.messages.iter_mut().find(|m| m.id == placeholder_id) else {
            self.pending = None;
            self.in_flight = false;
            return false;
        };

        msg.is_streaming = false;
        match outcome {
            Ok(response) => {
                info!(sources = response.sources.len(), "answer received");
                msg.text = response.answer;
                msg.sources = Some(response.sources);
                msg.response_time = response.response_time;
            }
            Err(AskError::Cancelled) => {
                info!("request stopped by user");
                msg.text = STOPPED_TEXT.to_string();
                msg.is_stopped = true;
            }
            Err(e) => {
                info!("request failed: {}", e);
                msg.text = FALLBACK_ERROR_TEXT.to_string();
                msg.is_error = true;
                self.error = Some(CONNECTION_ERROR_BANNER.to_string());
            }
        }

        self.pending = None;
        self.in_flight = false;
        true
    }

    /// Drop the transcript. Refused while a request is in flight.
    pub fn clear(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.messages.clear();
        self.error = None;
        self.pending = None;
        true
    }
}
