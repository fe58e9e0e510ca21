//! Conversation log persistence
//!
//! SQLite-backed append-only store for conversations and messages.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Conversation Operations ====================

    /// Create a new conversation owned by the given user
    pub fn create_conversation(&self, user_id: &str) -> DbResult<Conversation> {
        let conn = self.conn.lock().unwrap();
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO conversations (id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![id, user_id, now.to_rfc3339()],
        )?;

        Ok(Conversation {
            id,
            user_id: user_id.to_string(),
            created_at: now,
        })
    }

    /// Get conversation by ID
    pub fn get_conversation(&self, id: &str) -> DbResult<Conversation> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, user_id, created_at FROM conversations WHERE id = ?1")?;

        stmt.query_row(params![id], |row| {
            Ok(Conversation {
                id: row.get(0)?,
                user_id: row.get(1)?,
                created_at: parse_datetime(&row.get::<_, String>(2)?),
            })
        })
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::ConversationNotFound(id.to_string()),
            other => DbError::Sqlite(other),
        })
    }

    // ==================== Message Operations ====================

    /// Append a message to a conversation.
    ///
    /// Assigns id, per-conversation sequence number and timestamp; the
    /// sequence number breaks timestamp ties so replayed history and
    /// incrementally applied pushes agree on ordering.
    pub fn append_message(&self, conversation_id: &str, new: NewMessage) -> DbResult<Message> {
        let conn = self.conn.lock().unwrap();
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let sequence_id: i64 = conn.query_row(
            "SELECT COALESCE(MAX(sequence_id), 0) + 1 FROM messages WHERE conversation_id = ?1",
            params![conversation_id],
            |row| row.get(0),
        )?;

        let metadata_str = new
            .metadata
            .as_ref()
            .and_then(|m| serde_json::to_string(m).ok());

        conn.execute(
            "INSERT INTO messages (id, conversation_id, sequence_id, role, content, agent_type, agent_status, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                conversation_id,
                sequence_id,
                new.role.as_str(),
                new.content,
                new.agent_type.map(AgentType::as_str),
                new.agent_status.map(AgentStatus::as_str),
                metadata_str,
                now.to_rfc3339(),
            ],
        )?;

        Ok(Message {
            id,
            conversation_id: conversation_id.to_string(),
            sequence_id,
            role: new.role,
            content: new.content,
            agent_type: new.agent_type,
            agent_status: new.agent_status,
            metadata: new.metadata,
            created_at: now,
        })
    }

    /// Full ordered history for a conversation: timestamp ascending,
    /// insertion order breaking ties.
    pub fn get_messages(&self, conversation_id: &str) -> DbResult<Vec<Message>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, sequence_id, role, content, agent_type, agent_status, metadata, created_at
             FROM messages
             WHERE conversation_id = ?1
             ORDER BY created_at ASC, sequence_id ASC",
        )?;

        let rows = stmt.query_map(params![conversation_id], row_to_message)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    // Malformed metadata is dropped, not surfaced; the plain content
    // column is always shown.
    let metadata = row
        .get::<_, Option<String>>(7)?
        .and_then(|s| serde_json::from_str(&s).ok());

    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        sequence_id: row.get(2)?,
        role: Role::parse(&row.get::<_, String>(3)?),
        content: row.get(4)?,
        agent_type: row
            .get::<_, Option<String>>(5)?
            .as_deref()
            .and_then(AgentType::parse),
        agent_status: row
            .get::<_, Option<String>>(6)?
            .as_deref()
            .and_then(AgentStatus::parse),
        metadata,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn create_and_get_conversation() {
        let db = test_db();
        let conv = db.create_conversation("user-1").unwrap();
        let loaded = db.get_conversation(&conv.id).unwrap();
        assert_eq!(loaded.id, conv.id);
        assert_eq!(loaded.user_id, "user-1");
    }

    #[test]
    fn missing_conversation_is_not_found() {
        let db = test_db();
        assert!(matches!(
            db.get_conversation("nope"),
            Err(DbError::ConversationNotFound(_))
        ));
    }

    #[test]
    fn append_assigns_monotonic_sequence_ids() {
        let db = test_db();
        let conv = db.create_conversation("u").unwrap();

        let m1 = db
            .append_message(&conv.id, NewMessage::user("first"))
            .unwrap();
        let m2 = db
            .append_message(&conv.id, NewMessage::user("second"))
            .unwrap();
        let m3 = db
            .append_message(&conv.id, NewMessage::user("third"))
            .unwrap();

        assert_eq!(m1.sequence_id, 1);
        assert_eq!(m2.sequence_id, 2);
        assert_eq!(m3.sequence_id, 3);
        assert_ne!(m1.id, m2.id);
    }

    #[test]
    fn history_order_matches_insertion_under_equal_timestamps() {
        // Messages appended in the same millisecond share a timestamp;
        // the sequence id must keep them in insertion order.
        let db = test_db();
        let conv = db.create_conversation("u").unwrap();

        let appended: Vec<Message> = (0..10)
            .map(|i| {
                db.append_message(&conv.id, NewMessage::user(format!("msg {i}")))
                    .unwrap()
            })
            .collect();

        let loaded = db.get_messages(&conv.id).unwrap();
        assert_eq!(loaded, appended);
    }

    #[test]
    fn metadata_survives_persistence() {
        let db = test_db();
        let conv = db.create_conversation("u").unwrap();

        let meta = MessageMetadata::Flight {
            results: vec![FlightOfferSummary {
                carrier_code: "AF".to_string(),
                flight_number: "8".to_string(),
                price_total: "512.00".to_string(),
                currency: "EUR".to_string(),
                duration: "8h10m".to_string(),
                stops: 1,
            }],
        };
        db.append_message(
            &conv.id,
            NewMessage::assistant("found one", AgentType::Flight, Some(meta.clone())),
        )
        .unwrap();

        let loaded = db.get_messages(&conv.id).unwrap();
        assert_eq!(loaded[0].metadata, Some(meta));
        assert_eq!(loaded[0].agent_status, Some(AgentStatus::Completed));
    }

    #[test]
    fn malformed_metadata_is_dropped_on_read() {
        let db = test_db();
        let conv = db.create_conversation("u").unwrap();
        let msg = db
            .append_message(&conv.id, NewMessage::user("hello"))
            .unwrap();

        {
            let conn = db.conn.lock().unwrap();
            conn.execute(
                "UPDATE messages SET metadata = '{not json' WHERE id = ?1",
                params![msg.id],
            )
            .unwrap();
        }

        let loaded = db.get_messages(&conv.id).unwrap();
        assert_eq!(loaded[0].metadata, None);
        assert_eq!(loaded[0].content, "hello");
    }
}
