//! Client side of the ask service

mod client;
mod types;

pub use client::{AskClient, Asker};
pub use types::{AskRequest, AskResponse, HealthStatus, Source};
