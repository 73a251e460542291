//! SQLite-backed implementation of the assistant's storage capability.
//!
//! Sessions and messages are append-only from this side; the knowledge
//! catalog is read in full and written only when seeding.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use concierge_core::error::ConciergeError;
use concierge_core::store::AssistantStore;
use concierge_core::types::{ConversationMessage, ConversationSession, KnowledgeItem, Sender};

use crate::db::Database;

/// Sessions, messages, and knowledge catalog stored in SQLite.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Number of rows in the knowledge table.
    pub fn knowledge_count(&self) -> Result<u64, ConciergeError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM knowledge_items", [], |row| row.get(0))
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }

    /// Insert or replace knowledge items in a single transaction.
    pub fn upsert_knowledge(&self, items: &[KnowledgeItem]) -> Result<usize, ConciergeError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;
            for item in items {
                let keywords = serde_json::to_string(&item.keywords)?;
                tx.execute(
                    "INSERT OR REPLACE INTO knowledge_items (id, category, title, content, keywords)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![item.id, item.category, item.title, item.content, keywords],
                )
                .map_err(|e| ConciergeError::Storage(format!("Failed to save knowledge: {}", e)))?;
            }
            tx.commit()
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;
            Ok(items.len())
        })
    }

    /// Seed the knowledge table if it is empty. Returns the number of rows written.
    pub fn seed_knowledge_if_empty(
        &self,
        items: &[KnowledgeItem],
    ) -> Result<usize, ConciergeError> {
        if self.knowledge_count()? > 0 {
            return Ok(0);
        }
        let written = self.upsert_knowledge(items)?;
        tracing::info!(items = written, "Knowledge catalog seeded");
        Ok(written)
    }
}

impl AssistantStore for SqliteStore {
    fn create_session(&self) -> Result<ConversationSession, ConciergeError> {
        let id = Uuid::new_v4().to_string();
        let created_ms = Utc::now().timestamp_millis();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_sessions (id, created_at) VALUES (?1, ?2)",
                rusqlite::params![id, created_ms],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to create session: {}", e)))?;
            Ok(())
        })?;
        Ok(ConversationSession {
            id,
            created_at: millis_to_datetime(created_ms)?,
        })
    }

    fn find_session(&self, session_id: &str) -> Result<Option<ConversationSession>, ConciergeError> {
        let created_ms: Option<i64> = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT created_at FROM chat_sessions WHERE id = ?1",
                rusqlite::params![session_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ConciergeError::Storage(e.to_string()))
        })?;

        created_ms
            .map(|ms| {
                Ok(ConversationSession {
                    id: session_id.to_string(),
                    created_at: millis_to_datetime(ms)?,
                })
            })
            .transpose()
    }

    fn save_message(
        &self,
        session_id: &str,
        sender: Sender,
        content: &str,
        suggestions: Option<&[String]>,
    ) -> Result<(), ConciergeError> {
        let suggestions = suggestions.map(serde_json::to_string).transpose()?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (id, session_id, sender, content, timestamp, suggestions)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    Uuid::new_v4().to_string(),
                    session_id,
                    sender.to_string(),
                    content,
                    Utc::now().timestamp_millis(),
                    suggestions,
                ],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to save message: {}", e)))?;
            Ok(())
        })
    }

    fn get_history(&self, session_id: &str) -> Result<Vec<ConversationMessage>, ConciergeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, session_id, sender, content, timestamp, suggestions
                     FROM chat_messages
                     WHERE session_id = ?1
                     ORDER BY timestamp ASC, rowid ASC",
                )
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![session_id], |row| Ok(row_to_message(row)))
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;

            let mut messages = Vec::new();
            for row in rows {
                let message = row.map_err(|e| ConciergeError::Storage(e.to_string()))??;
                messages.push(message);
            }
            Ok(messages)
        })
    }

    fn load_catalog(&self) -> Result<Vec<KnowledgeItem>, ConciergeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, category, title, content, keywords
                     FROM knowledge_items
                     ORDER BY category ASC, id ASC",
                )
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| Ok(row_to_knowledge(row)))
                .map_err(|e| ConciergeError::Storage(e.to_string()))?;

            let mut items = Vec::new();
            for row in rows {
                let item = row.map_err(|e| ConciergeError::Storage(e.to_string()))??;
                items.push(item);
            }
            Ok(items)
        })
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<ConversationMessage, ConciergeError> {
    let id: String = row
        .get(0)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;
    let session_id: String = row
        .get(1)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;
    let sender: String = row
        .get(2)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;
    let content: String = row
        .get(3)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;
    let timestamp_ms: i64 = row
        .get(4)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;
    let suggestions: Option<String> = row
        .get(5)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;

    Ok(ConversationMessage {
        id,
        session_id,
        sender: sender.parse::<Sender>().map_err(ConciergeError::Storage)?,
        content,
        timestamp: millis_to_datetime(timestamp_ms)?,
        suggestions: suggestions
            .map(|s| serde_json::from_str::<Vec<String>>(&s))
            .transpose()?,
    })
}

fn row_to_knowledge(row: &rusqlite::Row<'_>) -> Result<KnowledgeItem, ConciergeError> {
    let keywords: String = row
        .get(4)
        .map_err(|e| ConciergeError::Storage(e.to_string()))?;
    let keywords: Vec<String> = serde_json::from_str(&keywords)?;

    Ok(KnowledgeItem {
        id: row
            .get(0)
            .map_err(|e| ConciergeError::Storage(e.to_string()))?,
        category: row
            .get(1)
            .map_err(|e| ConciergeError::Storage(e.to_string()))?,
        title: row
            .get(2)
            .map_err(|e| ConciergeError::Storage(e.to_string()))?,
        content: row
            .get(3)
            .map_err(|e| ConciergeError::Storage(e.to_string()))?,
        keywords: KnowledgeItem::normalize_keywords(keywords),
    })
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, ConciergeError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| ConciergeError::Storage(format!("Invalid timestamp: {}", ms)))
}

// =============================================================================
// Tests
// =============================================================================
