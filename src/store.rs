//! Append/subscribe facade over the conversation log
//!
//! The dispatcher talks to the persistence platform through exactly
//! two operations: `append` (insert, then fan out to subscribers) and
//! `subscribe` (per-conversation broadcast channel). Delivery is
//! at-least-once relative to direct responses; consumers dedupe by
//! message id.

use crate::db::{Database, DbResult, Message, NewMessage};
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

const CHANNEL_CAPACITY: usize = 128;

/// Message store combining the SQLite log with realtime fan-out
pub struct MessageStore {
    db: Database,
    channels: RwLock<HashMap<String, broadcast::Sender<Message>>>,
}

impl MessageStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Direct access to the underlying log
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Append a message and notify subscribers.
    ///
    /// The insert is authoritative; a lagging or absent subscriber
    /// never fails the append.
    pub async fn append(&self, conversation_id: &str, new: NewMessage) -> DbResult<Message> {
        let message = self.db.append_message(conversation_id, new)?;

        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(conversation_id) {
            let _ = tx.send(message.clone());
        }

        Ok(message)
    }

    /// Subscribe to new messages for a conversation
    pub async fn subscribe(&self, conversation_id: &str) -> broadcast::Receiver<Message> {
        let mut channels = self.channels.write().await;
        channels
            .entry(conversation_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}
