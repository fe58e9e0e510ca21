//! Pure session transition logic
//!
//! `Session::handle` is pure: it mutates only the machine's own state
//! and returns effects for the driver to execute. No I/O happens here.

use super::{DispatchResult, SessionEffect, SessionEvent, SessionState, TokenId};
use crate::db::{AgentStatus, Role};
use std::collections::HashSet;

/// Per-conversation session machine
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    next_token: u64,
    /// Ids of messages already applied; pushes are at-least-once
    seen: HashSet<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            next_token: 1,
            seen: HashSet::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Apply one event, returning the effects to execute in order.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        match event {
            SessionEvent::Send { text } => self.handle_send(text),
            SessionEvent::Interrupt => self.handle_interrupt(),
            SessionEvent::DispatchResolved { token, result } => {
                self.handle_resolved(token, result)
            }
            SessionEvent::Push { message } => self.handle_push(message),
            // History load failures surface once and are not retried.
            SessionEvent::LoadFailed { error } => {
                vec![SessionEffect::NotifyError { message: error }]
            }
        }
    }

    /// Sending while a turn is in flight interrupts that turn first;
    /// its eventual resolution arrives under a stale token and is
    /// discarded.
    fn handle_send(&mut self, text: String) -> Vec<SessionEffect> {
        let mut effects = Vec::new();

        if let SessionState::InFlight { token } = self.state {
            effects.push(SessionEffect::CancelToken { token });
            effects.push(SessionEffect::ClearAgentStatus);
            effects.push(SessionEffect::NotifyInterrupted);
        }

        let token = TokenId(self.next_token);
        self.next_token += 1;
        self.state = SessionState::InFlight { token };
        effects.push(SessionEffect::DispatchTurn { token, text });

        effects
    }

    fn handle_interrupt(&mut self) -> Vec<SessionEffect> {
        match self.state {
            SessionState::Idle => Vec::new(),
            SessionState::InFlight { token } => {
                self.state = SessionState::Idle;
                vec![
                    SessionEffect::CancelToken { token },
                    SessionEffect::ClearAgentStatus,
                    SessionEffect::NotifyInterrupted,
                ]
            }
        }
    }

    /// Only the current token resolves the session. Stale resolutions,
    /// including failures of a cancelled turn, produce nothing.
    fn handle_resolved(&mut self, token: TokenId, result: DispatchResult) -> Vec<SessionEffect> {
        if self.state != (SessionState::InFlight { token }) {
            return Vec::new();
        }

        self.state = SessionState::Idle;
        match result {
            DispatchResult::Success => vec![SessionEffect::ClearAgentStatus],
            DispatchResult::Failure { error } => vec![
                SessionEffect::ClearAgentStatus,
                SessionEffect::NotifyError { message: error },
            ],
        }
    }

    /// Pushes update the transcript and the status indicator but never
    /// the dispatch state: a late push for a cancelled turn must not
    /// reopen the session.
    fn handle_push(&mut self, message: crate::db::Message) -> Vec<SessionEffect> {
        if !self.seen.insert(message.id.clone()) {
            return Vec::new();
        }

        let mut effects = Vec::new();

        match (message.role, message.agent_type, message.agent_status) {
            (Role::Agent, Some(agent), Some(status))
                if matches!(status, AgentStatus::Thinking | AgentStatus::Searching) =>
            {
                effects.push(SessionEffect::ShowAgentStatus { agent, status });
            }
            (Role::Assistant, _, _) => {
                effects.push(SessionEffect::ClearAgentStatus);
            }
            _ => {}
        }

        effects.insert(0, SessionEffect::AppendMessage { message });
        effects
    }
}
