//! Canonical writes: session upserts and message inserts
//!
//! `insert_message` is the only path into `messages_fts`. The index row is
//! written in the same savepoint as the message row, and only when the
//! message row is new, which keeps the two tables in one-to-one
//! correspondence by uuid.

use history_core::{Message, SessionSummary};
use rusqlite::{params, Connection};

use crate::connection::{with_savepoint, IndexerError};

/// Result of [`insert_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

/// Merge a session summary into the sessions table.
///
/// A new session is inserted as-is. An existing one keeps its first_ts and
/// location, takes the later of the two last_ts values, and adds the
/// incoming count to its message_count.
pub fn upsert_session(conn: &Connection, summary: &SessionSummary) -> Result<(), IndexerError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO sessions
         (session_id, project, cwd, git_branch, first_ts, last_ts, message_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(session_id) DO UPDATE SET
            last_ts = MAX(last_ts, excluded.last_ts),
            message_count = message_count + excluded.message_count",
    )?;

    stmt.execute(params![
        summary.session_id,
        summary.project,
        summary.cwd,
        summary.git_branch,
        summary.first_ts,
        summary.last_ts,
        summary.message_count,
    ])?;

    Ok(())
}

/// Insert a message and its index entry as one unit of work.
///
/// An existing uuid is left untouched and reported as
/// [`InsertOutcome::AlreadyPresent`]; no index write happens in that case.
pub fn insert_message(conn: &Connection, message: &Message) -> Result<InsertOutcome, IndexerError> {
    let tool_names = serde_json::to_string(&message.tool_names)?;

    with_savepoint(conn, "insert_message", |conn| {
        let inserted = conn
            .prepare_cached(
                "INSERT INTO messages
                 (uuid, session_id, parent_uuid, type, role, content, timestamp, model, tool_names)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(uuid) DO NOTHING",
            )?
            .execute(params![
                message.uuid,
                message.session_id,
                message.parent_uuid,
                message.message_type.as_str(),
                message.role,
                message.content,
                message.timestamp,
                message.model,
                tool_names,
            ])?;

        if inserted == 0 {
            return Ok(InsertOutcome::AlreadyPresent);
        }

        let rowid = conn.last_insert_rowid();
        conn.prepare_cached("INSERT INTO messages_fts (rowid, uuid, content) VALUES (?1, ?2, ?3)")?
            .execute(params![rowid, message.uuid, message.content])?;

        Ok(InsertOutcome::Inserted)
    })
}
