//! ask-chat - terminal chat client for a retrieval-augmented /ask service

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod repl;

pub use api::{AskClient, AskResponse, Asker, Source};
pub use chat::{ChatController, ChatState, Message, Role};
pub use error::{AskError, AskResult};
