//! Turn dispatcher
//!
//! Orchestrates one chat turn end to end: resolve the conversation,
//! persist the user message, route to a handler, persist the interim
//! status, and persist the terminal reply. All writes to the message
//! log happen here; handlers stay pure.

use crate::agents::{run_handler, status_note};
use crate::db::{AgentType, DbError, NewMessage};
use crate::flights::FlightProvider;
use crate::intent::{classify, route};
use crate::llm::{Advisor, AdvisoryError, ChatMessage};
use crate::store::MessageStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),
}

/// Result of a successfully dispatched turn
#[derive(Debug)]
pub struct DispatchOutcome {
    pub conversation_id: String,
    pub response: String,
    pub agent: AgentType,
}

pub struct Dispatcher {
    store: Arc<MessageStore>,
    advisor: Arc<dyn Advisor>,
    flights: Arc<dyn FlightProvider>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<MessageStore>,
        advisor: Arc<dyn Advisor>,
        flights: Arc<dyn FlightProvider>,
    ) -> Self {
        Self {
            store,
            advisor,
            flights,
        }
    }

    /// Dispatch one user message. A missing conversation id starts a
    /// new conversation.
    ///
    /// On advisory failure the user message and interim status remain
    /// in the log with no terminal message; the error propagates to
    /// the caller.
    pub async fn dispatch(
        &self,
        user_id: Option<&str>,
        conversation_id: Option<&str>,
        message: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let conversation_id = match conversation_id {
            Some(id) => {
                self.store.db().get_conversation(id)?;
                id.to_string()
            }
            None => {
                let conversation = self
                    .store
                    .db()
                    .create_conversation(user_id.unwrap_or("local"))?;
                conversation.id
            }
        };

        // History is captured before this turn's user message so the
        // advisory request does not see the latest message twice.
        let history: Vec<ChatMessage> = self
            .store
            .db()
            .get_messages(&conversation_id)?
            .iter()
            .map(ChatMessage::from)
            .collect();

        self.store
            .append(&conversation_id, NewMessage::user(message))
            .await?;

        let agent = route(classify(message));
        info!(
            conversation_id = %conversation_id,
            agent = agent.as_str(),
            history_len = history.len(),
            "Dispatching turn"
        );

        let (status, note) = status_note(agent);
        self.store
            .append(
                &conversation_id,
                NewMessage::agent_status(agent, status, note),
            )
            .await?;

        let reply = run_handler(
            agent,
            message,
            &history,
            self.advisor.as_ref(),
            self.flights.as_ref(),
        )
        .await?;

        let terminal = self
            .store
            .append(
                &conversation_id,
                NewMessage::assistant(reply.text, reply.agent, reply.metadata),
            )
            .await?;

        Ok(DispatchOutcome {
            conversation_id,
            response: terminal.content,
            agent: reply.agent,
        })
    }
}
