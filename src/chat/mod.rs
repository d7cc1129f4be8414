//! Conversation state and the request lifecycle around it

mod controller;
mod message;
mod state;

pub use controller::ChatController;
pub use message::{Message, Role};
pub use state::{ChatState, PendingAsk, CONNECTION_ERROR_BANNER, FALLBACK_ERROR_TEXT, STOPPED_TEXT};
