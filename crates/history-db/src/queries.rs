//! Full-text search over message content

use history_core::{project_name, EventType};
use rusqlite::types::Type;
use serde::Serialize;

use crate::connection::{DbError, HistoryDb};

/// Result ordering for [`HistoryDb::search`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Newest message first
    #[default]
    Recent,
    /// Best bm25 match first
    Relevance,
}

/// How the query text is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuerySyntax {
    /// Every word must appear; FTS operators and punctuation are literal
    #[default]
    Literal,
    /// Passed to FTS5 `MATCH` unchanged: prefixes (`deploy*`), `OR`,
    /// `NOT`, `NEAR` and ordered `"phrases"`
    Fts5,
}

/// Strings wrapped around every matched span in a snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarkers {
    pub open: String,
    pub close: String,
}

impl HighlightMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for HighlightMarkers {
    fn default() -> Self {
        Self::new(">>>", "<<<")
    }
}

/// Options for [`HistoryDb::search`]
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: usize,
    pub sort: SortMode,
    pub syntax: QuerySyntax,
    pub markers: HighlightMarkers,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            sort: SortMode::default(),
            syntax: QuerySyntax::default(),
            markers: HighlightMarkers::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_syntax(mut self, syntax: QuerySyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_markers(mut self, markers: HighlightMarkers) -> Self {
        self.markers = markers;
        self
    }
}

/// One search match
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub uuid: String,
    pub session_id: String,
    pub message_type: EventType,
    pub role: String,
    pub content: String,
    pub timestamp: String,
    /// Project path of the owning session, if the session row exists
    pub project: Option<String>,
    pub project_name: Option<String>,
    pub branch: Option<String>,
    /// Content with matched spans wrapped in the requested markers
    pub highlighted: String,
}

impl HistoryDb {
    /// Search message content.
    ///
    /// With [`QuerySyntax::Literal`] each whitespace-separated word of
    /// `query` must match and is quoted so FTS operators and punctuation are
    /// taken literally. With [`QuerySyntax::Fts5`] the query goes to FTS5
    /// as written, and a query FTS5 rejects gives [`DbError::InvalidQuery`].
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>, DbError> {
        let fts_query = match options.syntax {
            QuerySyntax::Literal => fts_query(query),
            QuerySyntax::Fts5 => Some(query.trim().to_string()).filter(|q| !q.is_empty()),
        };
        let Some(fts_query) = fts_query else {
            return Ok(Vec::new());
        };

        let order = match options.sort {
            SortMode::Recent => "m.timestamp DESC, m.id DESC",
            SortMode::Relevance => "bm25(messages_fts), m.timestamp DESC",
        };

        let sql = format!(
            "SELECT
                m.uuid, m.session_id, m.type, m.role, m.content, m.timestamp,
                s.project, s.git_branch,
                highlight(messages_fts, 1, ?2, ?3)
             FROM messages_fts
             JOIN messages m ON m.id = messages_fts.rowid
             LEFT JOIN sessions s ON s.session_id = m.session_id
             WHERE messages_fts MATCH ?1
             ORDER BY {order}
             LIMIT ?4"
        );

        let hits = self
            .run_search(&sql, &fts_query, options)
            .map_err(|e| match options.syntax {
                QuerySyntax::Fts5 => invalid_query(e, &fts_query),
                QuerySyntax::Literal => DbError::Sqlite(e),
            })?;

        tracing::debug!(query, hits = hits.len(), "search");
        Ok(hits)
    }

    fn run_search(
        &self,
        sql: &str,
        fts_query: &str,
        options: &SearchOptions,
    ) -> rusqlite::Result<Vec<SearchHit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(
            rusqlite::params![
                fts_query,
                options.markers.open,
                options.markers.close,
                options.limit as i64
            ],
            |row| {
                let project: Option<String> = row.get(6)?;
                Ok(SearchHit {
                    uuid: row.get(0)?,
                    session_id: row.get(1)?,
                    message_type: event_type_at(row, 2)?,
                    role: row.get(3)?,
                    content: row.get(4)?,
                    timestamp: row.get(5)?,
                    project_name: project
                        .as_deref()
                        .and_then(project_name)
                        .map(str::to_string),
                    project,
                    branch: row.get(7)?,
                    highlighted: row.get(8)?,
                })
            },
        )?;

        let hits = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hits)
    }
}

/// Report an FTS5 parse failure as a query error, anything else as SQLite
fn invalid_query(err: rusqlite::Error, query: &str) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(_, Some(msg))
            if msg.starts_with("fts5:")
                || msg.contains("syntax error")
                || msg.starts_with("no such column") =>
        {
            DbError::InvalidQuery {
                query: query.to_string(),
                reason: msg.clone(),
            }
        }
        _ => DbError::Sqlite(err),
    }
}

/// Build an FTS5 query that ANDs every word as a literal phrase
fn fts_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|w| format!("\"{}\"", w.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

/// Read a stored message type column
pub(crate) fn event_type_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<EventType> {
    let raw: String = row.get(idx)?;
    EventType::from_raw(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown message type: {raw}").into(),
        )
    })
}
