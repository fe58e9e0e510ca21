//! API request and response types

use crate::db::{AgentType, Message};
use serde::{Deserialize, Serialize};

/// Request to dispatch a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Omitted on the first message of a conversation
    #[serde(rename = "conversationId", default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Accepted for client compatibility. Interruption is handled
    /// entirely client-side; the dispatcher ignores this.
    #[serde(default)]
    pub interrupt: bool,
}

/// Response for a dispatched turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub agent: AgentType,
    pub conversation_id: String,
}

/// Response with a conversation's full history
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
