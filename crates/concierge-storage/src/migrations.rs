//! Database schema migrations.
//!
//! Applies the initial schema: chat sessions, chat messages, and the
//! knowledge catalog, plus the schema_migrations tracking table.

use rusqlite::Connection;
use tracing::info;

use concierge_core::error::ConciergeError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), ConciergeError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| ConciergeError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| {
            ConciergeError::Storage(format!("Failed to query migration version: {}", e))
        })?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
///
/// Timestamps are Unix milliseconds. Messages carry the implicit rowid, which
/// breaks ties between messages written within the same millisecond.
fn apply_v1(conn: &Connection) -> Result<(), ConciergeError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chat_sessions (
            id          TEXT PRIMARY KEY NOT NULL,
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chat_messages (
            id          TEXT PRIMARY KEY NOT NULL,
            session_id  TEXT NOT NULL,
            sender      TEXT NOT NULL CHECK (sender IN ('user', 'bot')),
            content     TEXT NOT NULL,
            timestamp   INTEGER NOT NULL,
            suggestions TEXT,
            FOREIGN KEY (session_id) REFERENCES chat_sessions(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_chat_messages_session
            ON chat_messages (session_id, timestamp ASC);

        CREATE TABLE IF NOT EXISTS knowledge_items (
            id          INTEGER PRIMARY KEY NOT NULL,
            category    TEXT NOT NULL,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            keywords    TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_knowledge_items_category
            ON knowledge_items (category);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| ConciergeError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}
