//! Events fed into the session machine

use super::state::TokenId;
use crate::db::Message;

/// How a dispatched turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Success,
    Failure { error: String },
}

/// Inputs to the session machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// User submitted a message
    Send { text: String },
    /// User asked to stop the current turn
    Interrupt,
    /// A dispatched turn resolved. Stale tokens are ignored.
    DispatchResolved {
        token: TokenId,
        result: DispatchResult,
    },
    /// A message arrived over the realtime mirror
    Push { message: Message },
    /// Replaying the conversation history failed
    LoadFailed { error: String },
}
