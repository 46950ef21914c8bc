//! history-core - Core types and pure logic for the history indexer
//!
//! This crate turns raw Claude Code JSONL lines into typed event records,
//! normalizes their message payloads into searchable text, and aggregates
//! per-session statistics for a single file pass. Nothing here touches the
//! database; see `history-indexer` for writes and `history-db` for queries.

pub mod aggregator;
pub mod normalize;
pub mod parser;
pub mod types;

pub use aggregator::*;
pub use normalize::*;
pub use parser::*;
pub use types::*;
