//! Read-write database connection for indexing operations

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema;

/// Indexer database errors
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-write database connection for indexing
pub struct IndexerDb {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl IndexerDb {
    /// Open or create the database at a specific path
    pub fn open_or_create(path: &Path) -> Result<Self, IndexerError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, IndexerError> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self, IndexerError> {
        let mut db = Self { conn, path };
        schema::init_schema(&mut db.conn)?;
        Ok(db)
    }

    /// Get the database path (`None` for in-memory databases)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a transaction
    pub fn transaction<F, T>(&mut self, f: F) -> Result<T, IndexerError>
    where
        F: FnOnce(&Connection) -> Result<T, IndexerError>,
    {
        let tx = self.conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

/// Run `f` inside a named savepoint.
///
/// The savepoint is released on success and rolled back on error, so every
/// write made by `f` lands together or not at all.
pub(crate) fn with_savepoint<F, T>(conn: &Connection, name: &str, f: F) -> Result<T, IndexerError>
where
    F: FnOnce(&Connection) -> Result<T, IndexerError>,
{
    conn.execute_batch(&format!("SAVEPOINT {name}"))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name}"))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) =
                conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))
            {
                tracing::error!(savepoint = name, error = %rollback_err, "savepoint rollback failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_open_or_create_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("history.db");

        let db = IndexerDb::open_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
    }

    #[test]
    fn test_savepoint_rolls_back_on_error() {
        let db = IndexerDb::open_in_memory().unwrap();
        let conn = db.connection();

        let result: Result<(), IndexerError> = with_savepoint(conn, "sp_test", |conn| {
            conn.execute(
                "INSERT INTO sessions (session_id) VALUES ('s1')",
                [],
            )?;
            Err(IndexerError::Io(std::io::Error::other("boom")))
        });

        assert!(result.is_err());
        assert_eq!(count(conn), 0);
    }

    #[test]
    fn test_savepoint_releases_on_success() {
        let db = IndexerDb::open_in_memory().unwrap();
        let conn = db.connection();

        with_savepoint(conn, "sp_test", |conn| {
            conn.execute("INSERT INTO sessions (session_id) VALUES ('s1')", [])?;
            Ok(())
        })
        .unwrap();

        assert_eq!(count(conn), 1);
    }
}
