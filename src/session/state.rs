//! Session state types

/// Identifier for one dispatched turn. Tokens are never reused within
/// a session; comparing the current token against a resolution's token
/// is what makes stale results detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u64);

/// What the client is doing for this conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No turn outstanding
    Idle,
    /// One turn dispatched and not yet resolved
    InFlight { token: TokenId },
}

impl SessionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::InFlight { .. })
    }

    pub fn current_token(&self) -> Option<TokenId> {
        match self {
            SessionState::Idle => None,
            SessionState::InFlight { token } => Some(*token),
        }
    }
}
