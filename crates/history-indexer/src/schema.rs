//! Database schema creation
//!
//! The full-text index is a standalone FTS5 table whose rowid mirrors
//! `messages.id`. There are no triggers: rows reach `messages_fts` only
//! through [`crate::store::insert_message`].

use rusqlite::Connection;

use crate::connection::IndexerError;

/// Current database schema version
pub const DB_VERSION: i32 = 1;

/// Initialize the database schema (idempotent)
pub fn init_schema(conn: &mut Connection) -> Result<(), IndexerError> {
    // Metadata table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        )",
    )?;

    // Session aggregates
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sessions (
            session_id TEXT PRIMARY KEY,
            project TEXT NOT NULL DEFAULT '',
            cwd TEXT NOT NULL DEFAULT '',
            git_branch TEXT NOT NULL DEFAULT '',
            first_ts TEXT NOT NULL DEFAULT '',
            last_ts TEXT NOT NULL DEFAULT '',
            message_count INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_sessions_last_ts ON sessions(last_ts);",
    )?;

    // Messages, append-only
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            session_id TEXT NOT NULL,
            parent_uuid TEXT,
            type TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            timestamp TEXT NOT NULL DEFAULT '',
            model TEXT NOT NULL DEFAULT '',
            tool_names TEXT NOT NULL DEFAULT '[]'
        );
        CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id);
        CREATE INDEX IF NOT EXISTS idx_messages_type ON messages(type);
        CREATE INDEX IF NOT EXISTS idx_messages_ts ON messages(timestamp);",
    )?;

    // FTS5 virtual table for full-text search on message content
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS messages_fts USING fts5(
            uuid UNINDEXED,
            content
        )",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('version', ?1)",
        [&DB_VERSION.to_string()],
    )?;

    Ok(())
}
