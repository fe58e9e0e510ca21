//! Specialist agent handlers
//!
//! Each handler picks a role prompt, optionally gathers external data,
//! and asks the advisory model for the user-facing reply. Handlers do
//! not persist anything; the dispatcher owns all writes.

pub mod prompts;

use crate::db::{AgentStatus, AgentType, MessageMetadata};
use crate::flights::{extract_search_params, summarize_offers, FlightProvider};
use crate::llm::{Advisor, AdvisoryError, ChatMessage};
use chrono::Utc;
use tracing::warn;

/// Interim status note shown while a handler works
pub fn status_note(agent: AgentType) -> (AgentStatus, &'static str) {
    match agent {
        AgentType::Coordinator => (AgentStatus::Thinking, "Analyzing your request..."),
        AgentType::Flight => (AgentStatus::Searching, "Searching for flights..."),
        AgentType::Hotel => (AgentStatus::Searching, "Searching for hotels..."),
    }
}

/// Completed output of one handler turn
#[derive(Debug)]
pub struct TurnReply {
    pub text: String,
    pub agent: AgentType,
    pub metadata: Option<MessageMetadata>,
}

/// Run the handler for the routed agent. Advisory failures are fatal
/// for the turn; flight gateway failures degrade to general guidance.
pub async fn run_handler(
    agent: AgentType,
    message: &str,
    history: &[ChatMessage],
    advisor: &dyn Advisor,
    flights: &dyn FlightProvider,
) -> Result<TurnReply, AdvisoryError> {
    let (prompt, metadata) = match agent {
        AgentType::Coordinator => (prompts::COORDINATOR.to_string(), None),
        AgentType::Hotel => (prompts::HOTEL.to_string(), None),
        AgentType::Flight => match gather_offers(message, flights).await {
            Some((summary, results)) => (
                prompts::flight_with_offers(&summary),
                Some(MessageMetadata::Flight { results }),
            ),
            None => (prompts::FLIGHT_FALLBACK.to_string(), None),
        },
    };

    let text = advisor.generate(&prompt, history, message).await?;

    Ok(TurnReply {
        text,
        agent,
        metadata,
    })
}

/// Search live offers for a flight request. Any failure, including an
/// empty result set, returns `None` so the handler can fall back.
async fn gather_offers(
    message: &str,
    flights: &dyn FlightProvider,
) -> Option<(String, Vec<crate::db::FlightOfferSummary>)> {
    let today = Utc::now().date_naive();
    let params = match extract_search_params(message, today) {
        Some(params) => params,
        None => {
            warn!("No searchable route in message");
            return None;
        }
    };

    match flights.search(&params).await {
        Ok(offers) if !offers.is_empty() => Some(summarize_offers(&offers)),
        Ok(_) => {
            warn!(
                origin = %params.origin,
                destination = %params.destination,
                "Flight search returned no offers"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, "Flight search failed, degrading to general guidance");
            None
        }
    }
}
