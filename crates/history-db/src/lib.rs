//! history-db - Read-only query engine for the history database
//!
//! Search, session listing, transcript replay and statistics over the
//! database written by `history-indexer`.

pub mod connection;
pub mod queries;
pub mod sessions;

pub use connection::*;
pub use queries::*;
pub use sessions::*;
