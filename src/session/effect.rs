//! Effects produced by session transitions

use super::state::TokenId;
use crate::db::{AgentStatus, AgentType, Message};

/// Effects to be executed after a session transition
#[derive(Debug, Clone)]
pub enum SessionEffect {
    /// Cancel the in-flight request identified by the token
    CancelToken { token: TokenId },

    /// Start a new dispatch under the given token
    DispatchTurn { token: TokenId, text: String },

    /// Append a message to the displayed transcript
    AppendMessage { message: Message },

    /// Show an interim agent status indicator
    ShowAgentStatus {
        agent: AgentType,
        status: AgentStatus,
    },

    /// Remove the agent status indicator
    ClearAgentStatus,

    /// Tell the user the previous turn was interrupted
    NotifyInterrupted,

    /// Surface a turn failure to the user
    NotifyError { message: String },
}
