//! Effect executor for the session machine
//!
//! Owns the cancellation tokens and the displayed view (transcript,
//! status indicator, notices). Dispatches run as background tasks
//! raced against their cancellation token; a cancelled task resolves
//! silently.

use super::{DispatchResult, Session, SessionEffect, SessionEvent, SessionState, TokenId};
use crate::db::{AgentStatus, AgentType, Message};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Client side of the dispatch endpoint
#[async_trait]
pub trait DispatchClient: Send + Sync + 'static {
    async fn dispatch(&self, text: &str) -> Result<(), String>;
}

/// Runs a session against a dispatch client
pub struct SessionDriver<C> {
    client: Arc<C>,
    session: Session,
    tokens: HashMap<TokenId, CancellationToken>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    messages: Vec<Message>,
    active_status: Option<(AgentType, AgentStatus)>,
    notices: Vec<String>,
}

impl<C: DispatchClient> SessionDriver<C> {
    pub fn new(client: Arc<C>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            client,
            session: Session::new(),
            tokens: HashMap::new(),
            events_tx,
            events_rx,
            messages: Vec::new(),
            active_status: None,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn active_status(&self) -> Option<(AgentType, AgentStatus)> {
        self.active_status
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn send(&mut self, text: impl Into<String>) {
        self.apply(SessionEvent::Send { text: text.into() });
    }

    pub fn interrupt(&mut self) {
        self.apply(SessionEvent::Interrupt);
    }

    /// Feed one realtime push into the session
    pub fn push(&mut self, message: Message) {
        self.apply(SessionEvent::Push { message });
    }

    /// Wait for the next background event and apply it. Returns false
    /// once no dispatch task can ever produce one.
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        for effect in self.session.handle(event) {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::CancelToken { token } => {
                if let Some(cancel) = self.tokens.remove(&token) {
                    debug!(token = token.0, "Cancelling in-flight dispatch");
                    cancel.cancel();
                }
            }
            SessionEffect::DispatchTurn { token, text } => {
                let cancel = CancellationToken::new();
                self.tokens.insert(token, cancel.clone());

                let client = Arc::clone(&self.client);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!(token = token.0, "Dispatch cancelled");
                        }
                        result = client.dispatch(&text) => {
                            let result = match result {
                                Ok(()) => DispatchResult::Success,
                                Err(error) => DispatchResult::Failure { error },
                            };
                            let _ = events.send(SessionEvent::DispatchResolved { token, result });
                        }
                    }
                });
            }
            SessionEffect::AppendMessage { message } => {
                self.messages.push(message);
            }
            SessionEffect::ShowAgentStatus { agent, status } => {
                self.active_status = Some((agent, status));
            }
            SessionEffect::ClearAgentStatus => {
                self.active_status = None;
            }
            SessionEffect::NotifyInterrupted => {
                self.notices.push("Response interrupted".to_string());
            }
            SessionEffect::NotifyError { message } => {
                self.notices.push(message);
            }
        }
    }
}
