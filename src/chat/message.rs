//! Conversation messages

use uuid::Uuid;

use crate::api::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One entry in the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// Cited documents; only set on answered bot messages
    pub sources: Option<Vec<Source>>,
    /// Placeholder waiting on the service
    pub is_streaming: bool,
    pub is_error: bool,
    /// Request was cancelled before an answer arrived
    pub is_stopped: bool,
    /// Server-reported processing time in seconds
    pub response_time: Option<f64>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            text: text.into(),
            sources: None,
            is_streaming: false,
            is_error: false,
            is_stopped: false,
            response_time: None,
        }
    }

    /// Empty bot message shown while the request is in flight
    pub fn placeholder() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Bot,
            text: String::new(),
            sources: None,
            is_streaming: true,
            is_error: false,
            is_stopped: false,
            response_time: None,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }
}
