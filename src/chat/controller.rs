//! Drives one cancellable request per submission

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::message::Message;
use super::state::ChatState;
use crate::api::Asker;
use crate::error::AskError;

/// Couples the chat state with something that can answer questions
pub struct ChatController<A> {
    asker: A,
    state: ChatState,
}

impl<A: Asker> ChatController<A> {
    pub fn new(asker: A) -> Self {
        Self {
            asker,
            state: ChatState::new(),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ChatState {
        &mut self.state
    }

    pub fn asker(&self) -> &A {
        &self.asker
    }

    /// Submit `text` and wait for the answer, or for `cancel` to fire.
    ///
    /// Returns the resolved bot message, or `None` when the submission was
    /// rejected (blank, or another request in flight).
    pub async fn send(&mut self, text: &str, cancel: &CancellationToken) -> Option<&Message> {
        self.state.set_draft(text);
        let pending = self.state.submit()?;

        debug!(placeholder = %pending.placeholder_id, "request started");
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AskError::Cancelled),
            result = self.asker.ask(&pending.question) => result,
        };

        self.state.resolve(pending.placeholder_id, outcome);
        self.state
            .messages()
            .iter()
            .find(|m| m.id == pending.placeholder_id)
    }
}
