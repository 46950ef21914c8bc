//! history-indexer - Indexing pipeline for the Claude Code history database
//!
//! This crate owns all **write** operations to the history SQLite database.
//! The companion `history-db` crate provides read-only access for queries.
//! Both share the same database file.

pub mod config;
pub mod connection;
pub mod discovery;
pub mod indexer;
pub mod schema;
pub mod store;

pub use config::IndexerConfig;
pub use connection::{IndexerDb, IndexerError};
pub use discovery::find_log_files;
pub use indexer::{index_all, index_file, index_files, FileReport, IndexSummary};
pub use schema::{init_schema, DB_VERSION};
pub use store::{insert_message, upsert_session, InsertOutcome};
