//! Session listing and transcript lookup

use history_core::{truncate_chars, EventType, SessionSummary};
use rusqlite::types::Type;
use serde::Serialize;

use crate::connection::{DbError, HistoryDb};
use crate::queries::event_type_at;

/// Message content longer than this is cut in transcripts
pub const TRANSCRIPT_MAX_CHARS: usize = 800;

/// Appended to content cut at [`TRANSCRIPT_MAX_CHARS`]
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// A message as replayed in a transcript
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptMessage {
    pub uuid: String,
    pub parent_uuid: Option<String>,
    pub message_type: EventType,
    pub role: String,
    /// Content, cut to the display limit with the marker appended
    pub content: String,
    pub truncated: bool,
    pub timestamp: String,
    pub model: String,
    pub tool_names: Vec<String>,
}

impl TranscriptMessage {
    /// Role for display, falling back to the message type
    pub fn display_role(&self) -> &str {
        if self.role.is_empty() {
            self.message_type.as_str()
        } else {
            &self.role
        }
    }
}

/// A resolved session and its messages
#[derive(Debug, Clone, Serialize)]
pub struct SessionTranscript {
    pub session: SessionSummary,
    /// Messages in timestamp order
    pub messages: Vec<TranscriptMessage>,
    /// Other session IDs that shared the prefix
    pub other_matches: Vec<String>,
}

/// Result of [`HistoryDb::show_session`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionLookup {
    NotFound,
    Found(SessionTranscript),
}

impl SessionLookup {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionLookup::NotFound)
    }
}

const SESSION_COLUMNS: &str =
    "session_id, project, cwd, git_branch, first_ts, last_ts, message_count";

impl HistoryDb {
    /// Most recently active sessions first
    pub fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>, DbError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS}
             FROM sessions
             ORDER BY last_ts DESC, session_id
             LIMIT ?1"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([limit as i64], row_to_session)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// Sessions whose ID starts with `prefix`.
    ///
    /// An exact ID match sorts first, then the most recently active.
    pub fn find_sessions_by_prefix(&self, prefix: &str) -> Result<Vec<SessionSummary>, DbError> {
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {SESSION_COLUMNS}
             FROM sessions
             WHERE substr(session_id, 1, length(?1)) = ?1
             ORDER BY session_id = ?1 DESC, last_ts DESC, session_id"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([prefix], row_to_session)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// Replay the session matching `prefix`.
    ///
    /// An empty or unmatched prefix gives [`SessionLookup::NotFound`]. When
    /// several sessions match, the first from [`Self::find_sessions_by_prefix`]
    /// is shown and the rest are listed in `other_matches`.
    pub fn show_session(&self, prefix: &str, limit: Option<usize>) -> Result<SessionLookup, DbError> {
        let mut matches = self.find_sessions_by_prefix(prefix)?.into_iter();
        let Some(session) = matches.next() else {
            return Ok(SessionLookup::NotFound);
        };
        let other_matches: Vec<String> = matches.map(|s| s.session_id).collect();

        if !other_matches.is_empty() {
            tracing::debug!(
                prefix,
                chosen = %session.session_id,
                others = other_matches.len(),
                "ambiguous session prefix"
            );
        }

        let messages = self.session_messages(&session.session_id, limit)?;

        Ok(SessionLookup::Found(SessionTranscript {
            session,
            messages,
            other_matches,
        }))
    }

    fn session_messages(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TranscriptMessage>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, parent_uuid, type, role, content, timestamp, model, tool_names
             FROM messages
             WHERE session_id = ?1
             ORDER BY timestamp ASC, id ASC
             LIMIT ?2",
        )?;

        // LIMIT -1 means no limit in SQLite
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = stmt.query_map(rusqlite::params![session_id, limit], row_to_transcript_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

fn row_to_session(row: &rusqlite::Row) -> Result<SessionSummary, rusqlite::Error> {
    Ok(SessionSummary {
        session_id: row.get(0)?,
        project: row.get(1)?,
        cwd: row.get(2)?,
        git_branch: row.get(3)?,
        first_ts: row.get(4)?,
        last_ts: row.get(5)?,
        message_count: row.get(6)?,
    })
}

fn row_to_transcript_message(row: &rusqlite::Row) -> Result<TranscriptMessage, rusqlite::Error> {
    let content: String = row.get(4)?;
    let (content, truncated) = truncate_for_display(&content);

    let tool_names_raw: String = row.get(7)?;
    let tool_names: Vec<String> = serde_json::from_str(&tool_names_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(TranscriptMessage {
        uuid: row.get(0)?,
        parent_uuid: row.get(1)?,
        message_type: event_type_at(row, 2)?,
        role: row.get(3)?,
        content,
        truncated,
        timestamp: row.get(5)?,
        model: row.get(6)?,
        tool_names,
    })
}

fn truncate_for_display(content: &str) -> (String, bool) {
    let kept = truncate_chars(content, TRANSCRIPT_MAX_CHARS);
    if kept.len() < content.len() {
        (format!("{kept}{TRUNCATION_MARKER}"), true)
    } else {
        (content.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_display_short() {
        assert_eq!(truncate_for_display("short"), ("short".to_string(), false));
    }

    #[test]
    fn test_truncate_for_display_at_limit() {
        let exact = "a".repeat(TRANSCRIPT_MAX_CHARS);
        assert_eq!(truncate_for_display(&exact), (exact.clone(), false));
    }

    #[test]
    fn test_truncate_for_display_long() {
        let long = "ü".repeat(TRANSCRIPT_MAX_CHARS + 1);
        let (content, truncated) = truncate_for_display(&long);
        assert!(truncated);
        assert!(content.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            content.chars().count(),
            TRANSCRIPT_MAX_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }
}
