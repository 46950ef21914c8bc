//! Database connection management

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database not found at {0}")]
    NotFound(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database not initialized (run: claude-history index)")]
    NotInitialized,

    #[error("Invalid search query {query:?}: {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("Database version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Expected database version
pub const DB_VERSION: i32 = 1;

/// Read-only database connection
pub struct HistoryDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl HistoryDb {
    /// Open the database at a specific path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DbError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let db = Self { conn, path };
        db.check_version()?;

        Ok(db)
    }

    fn check_version(&self) -> Result<(), DbError> {
        match self.version() {
            None => Err(DbError::NotInitialized),
            Some(v) if v < DB_VERSION => Err(DbError::VersionMismatch {
                expected: DB_VERSION,
                found: v,
            }),
            Some(_) => Ok(()),
        }
    }

    fn version(&self) -> Option<i32> {
        self.conn
            .query_row(
                "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .ok()
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the underlying connection (for custom queries)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn count(&self, sql: &str) -> Result<i64, DbError> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    /// Counts from full scans of the canonical tables
    pub fn stats(&self) -> Result<HistoryStats, DbError> {
        let last_indexed: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'last_indexed'",
                [],
                |row| row.get(0),
            )
            .ok();

        let db_size = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        Ok(HistoryStats {
            version: self.version().unwrap_or(0),
            session_count: self.count("SELECT COUNT(*) FROM sessions")?,
            message_count: self.count("SELECT COUNT(*) FROM messages")?,
            user_message_count: self.count("SELECT COUNT(*) FROM messages WHERE type = 'user'")?,
            assistant_message_count: self
                .count("SELECT COUNT(*) FROM messages WHERE type = 'assistant'")?,
            last_indexed,
            db_path: self.path.clone(),
            db_size_bytes: db_size,
        })
    }

    /// Compare the messages table with the full-text index
    pub fn health(&self) -> Result<IndexHealth, DbError> {
        Ok(IndexHealth {
            messages: self.count("SELECT COUNT(*) FROM messages")?,
            index_entries: self.count("SELECT COUNT(*) FROM messages_fts")?,
            missing_entries: self.count(
                "SELECT COUNT(*) FROM messages m
                 WHERE NOT EXISTS (SELECT 1 FROM messages_fts f WHERE f.uuid = m.uuid)",
            )?,
            orphaned_entries: self.count(
                "SELECT COUNT(*) FROM messages_fts f
                 WHERE NOT EXISTS (SELECT 1 FROM messages m WHERE m.uuid = f.uuid)",
            )?,
            duplicate_entries: self
                .count("SELECT COUNT(*) - COUNT(DISTINCT uuid) FROM messages_fts")?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub version: i32,
    pub session_count: i64,
    pub message_count: i64,
    pub user_message_count: i64,
    pub assistant_message_count: i64,
    pub last_indexed: Option<String>,
    pub db_path: PathBuf,
    pub db_size_bytes: u64,
}

impl HistoryStats {
    /// Format database size as human-readable string
    pub fn format_size(&self) -> String {
        let bytes = self.db_size_bytes as f64;
        if bytes < 1024.0 {
            format!("{} B", bytes)
        } else if bytes < 1024.0 * 1024.0 {
            format!("{:.1} KB", bytes / 1024.0)
        } else if bytes < 1024.0 * 1024.0 * 1024.0 {
            format!("{:.1} MB", bytes / (1024.0 * 1024.0))
        } else {
            format!("{:.1} GB", bytes / (1024.0 * 1024.0 * 1024.0))
        }
    }
}

/// Correspondence between `messages` and `messages_fts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexHealth {
    pub messages: i64,
    pub index_entries: i64,
    /// Messages with no index entry
    pub missing_entries: i64,
    /// Index entries with no message
    pub orphaned_entries: i64,
    /// Extra index entries for an already-indexed uuid
    pub duplicate_entries: i64,
}

impl IndexHealth {
    pub fn is_consistent(&self) -> bool {
        self.messages == self.index_entries
            && self.missing_entries == 0
            && self.orphaned_entries == 0
            && self.duplicate_entries == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.db");
        assert!(matches!(HistoryDb::open(&path), Err(DbError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_open_uninitialized() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (x INTEGER)")
            .unwrap();

        assert!(matches!(HistoryDb::open(&path), Err(DbError::NotInitialized)));
    }

    #[test]
    fn test_open_old_version() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("old.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch(
                "CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT);
                 INSERT INTO metadata VALUES ('version', '0');",
            )
            .unwrap();

        assert!(matches!(
            HistoryDb::open(&path),
            Err(DbError::VersionMismatch { expected: DB_VERSION, found: 0 })
        ));
    }

    #[test]
    fn test_format_size() {
        let mut stats = HistoryStats {
            version: DB_VERSION,
            session_count: 0,
            message_count: 0,
            user_message_count: 0,
            assistant_message_count: 0,
            last_indexed: None,
            db_path: PathBuf::from("/tmp/x.db"),
            db_size_bytes: 512,
        };
        assert_eq!(stats.format_size(), "512 B");
        stats.db_size_bytes = 2048;
        assert_eq!(stats.format_size(), "2.0 KB");
        stats.db_size_bytes = 5 * 1024 * 1024;
        assert_eq!(stats.format_size(), "5.0 MB");
    }

    #[test]
    fn test_health_consistency() {
        let health = IndexHealth {
            messages: 2,
            index_entries: 2,
            missing_entries: 0,
            orphaned_entries: 0,
            duplicate_entries: 0,
        };
        assert!(health.is_consistent());

        let broken = IndexHealth {
            index_entries: 3,
            duplicate_entries: 1,
            ..health
        };
        assert!(!broken.is_consistent());
    }
}
