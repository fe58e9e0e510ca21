//! Database schema and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    conversation_id TEXT NOT NULL,
    sequence_id INTEGER NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    agent_type TEXT,
    agent_status TEXT,
    metadata TEXT,
    created_at TEXT NOT NULL,

    FOREIGN KEY (conversation_id) REFERENCES conversations(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_conversation
    ON messages(conversation_id, created_at, sequence_id);
"#;

/// Conversation record. Created on the first turn, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Who produced a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    /// Interim status notes emitted while a handler is working
    Agent,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Agent => "agent",
        }
    }

    /// Lenient parse; unknown values fall back to `User`
    pub fn parse(s: &str) -> Self {
        match s {
            "assistant" => Role::Assistant,
            "agent" => Role::Agent,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specialist that handled (or is handling) a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Coordinator,
    Flight,
    Hotel,
}

impl AgentType {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentType::Coordinator => "coordinator",
            AgentType::Flight => "flight",
            AgentType::Hotel => "hotel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "coordinator" => Some(AgentType::Coordinator),
            "flight" => Some(AgentType::Flight),
            "hotel" => Some(AgentType::Hotel),
            _ => None,
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress marker carried by agent and assistant messages.
///
/// Within one turn statuses only ever advance
/// thinking -> searching -> completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Thinking,
    Searching,
    Completed,
    Interrupted,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Thinking => "thinking",
            AgentStatus::Searching => "searching",
            AgentStatus::Completed => "completed",
            AgentStatus::Interrupted => "interrupted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "thinking" => Some(AgentStatus::Thinking),
            "searching" => Some(AgentStatus::Searching),
            "completed" => Some(AgentStatus::Completed),
            "interrupted" => Some(AgentStatus::Interrupted),
            _ => None,
        }
    }
}

/// One flight offer reduced to the fields shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOfferSummary {
    pub carrier_code: String,
    pub flight_number: String,
    pub price_total: String,
    pub currency: String,
    /// Human-readable duration, e.g. "4h30m"
    pub duration: String,
    pub stops: u32,
}

/// Structured result payload attached to a terminal message.
///
/// Validated where it is produced; on read, payloads that fail to
/// parse are dropped and the message text stands on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageMetadata {
    Flight { results: Vec<FlightOfferSummary> },
    Hotel { results: Vec<HotelOptionSummary> },
}

/// Reserved for a future hotel-data provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelOptionSummary {
    pub name: String,
    pub price_per_night: String,
    pub currency: String,
}

/// Persisted message record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    /// Insertion counter within the conversation; breaks timestamp ties
    pub sequence_id: i64,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_status: Option<AgentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
    pub created_at: DateTime<Utc>,
}

/// A message about to be appended; the store assigns id, sequence and
/// timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub agent_type: Option<AgentType>,
    pub agent_status: Option<AgentStatus>,
    pub metadata: Option<MessageMetadata>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            agent_type: None,
            agent_status: None,
            metadata: None,
        }
    }

    /// Interim status note persisted while a handler works
    pub fn agent_status(
        agent: AgentType,
        status: AgentStatus,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
            agent_type: Some(agent),
            agent_status: Some(status),
            metadata: None,
        }
    }

    /// Terminal assistant message for a completed turn
    pub fn assistant(
        content: impl Into<String>,
        agent: AgentType,
        metadata: Option<MessageMetadata>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            agent_type: Some(agent),
            agent_status: Some(AgentStatus::Completed),
            metadata,
        }
    }
}
