//! History JSONL file indexer
//!
//! Reads each log file in full, aggregates its sessions, then writes sessions
//! and messages inside one savepoint per file. Files are committed in batches
//! of `IndexerConfig::batch_size`, so an interrupted run keeps the batches
//! that finished and a re-run converges on the same messages.

use history_core::{parse_reader, LineReport, Message, SessionAggregator};
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::IndexerConfig;
use crate::connection::{with_savepoint, IndexerDb, IndexerError};
use crate::discovery;
use crate::store::{insert_message, upsert_session, InsertOutcome};

/// Result of indexing a single file
#[derive(Debug, Default, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub lines: LineReport,
    /// Session upserts performed
    pub sessions: usize,
    /// Kept events, each of which produced an insert attempt
    pub messages_seen: usize,
    pub messages_inserted: usize,
    pub duplicates: usize,
}

/// Totals for an indexing run
#[derive(Debug, Default, Clone, Serialize)]
pub struct IndexSummary {
    pub files_indexed: usize,
    /// Files skipped because they could not be read or written
    pub files_failed: usize,
    pub sessions: usize,
    pub messages_seen: usize,
    pub messages_inserted: usize,
    pub lines_discarded: usize,
}

impl IndexSummary {
    fn add(&mut self, report: &FileReport) {
        self.files_indexed += 1;
        self.sessions += report.sessions;
        self.messages_seen += report.messages_seen;
        self.messages_inserted += report.messages_inserted;
        self.lines_discarded += report.lines.discarded();
    }
}

/// Index a single JSONL file.
///
/// Reading happens before any write: an unreadable file returns an error
/// and leaves the database untouched. Writes for the file are applied in a
/// savepoint and rolled back together if any of them fails.
pub fn index_file(conn: &Connection, file_path: &Path) -> Result<FileReport, IndexerError> {
    let file = File::open(file_path)?;
    let (events, lines) = parse_reader(BufReader::new(file))?;

    let aggregator: SessionAggregator = events.iter().collect();
    let messages: Vec<Message> = events.iter().map(Message::from_event).collect();

    let mut report = FileReport {
        path: file_path.to_path_buf(),
        lines,
        messages_seen: messages.len(),
        ..Default::default()
    };

    with_savepoint(conn, "index_file", |conn| {
        for summary in aggregator.into_summaries() {
            upsert_session(conn, &summary)?;
            report.sessions += 1;
        }

        for message in &messages {
            match insert_message(conn, message)? {
                InsertOutcome::Inserted => report.messages_inserted += 1,
                InsertOutcome::AlreadyPresent => report.duplicates += 1,
            }
        }

        Ok(())
    })?;

    tracing::debug!(
        path = %file_path.display(),
        kept = report.lines.kept,
        discarded = report.lines.discarded(),
        inserted = report.messages_inserted,
        duplicates = report.duplicates,
        "indexed file"
    );

    Ok(report)
}

/// Index an explicit list of files, committing every `batch_size` files.
///
/// A file that fails is logged, counted in `files_failed`, and skipped.
/// `on_progress` is called after each file with (path, done, total).
pub fn index_files<F>(
    db: &mut IndexerDb,
    files: &[PathBuf],
    config: &IndexerConfig,
    mut on_progress: F,
) -> Result<IndexSummary, IndexerError>
where
    F: FnMut(&Path, usize, usize),
{
    let total = files.len();
    let mut summary = IndexSummary::default();
    let mut done = 0;

    for batch in files.chunks(config.effective_batch_size()) {
        db.transaction(|conn| {
            for file in batch {
                match index_file(conn, file) {
                    Ok(report) => summary.add(&report),
                    Err(e) => {
                        tracing::warn!(path = %file.display(), error = %e, "skipping file");
                        summary.files_failed += 1;
                    }
                }
                done += 1;
                on_progress(file, done, total);
            }
            Ok(())
        })?;
        tracing::debug!(done, total, "committed batch");
    }

    let now = chrono::Utc::now().to_rfc3339();
    db.connection().execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('last_indexed', ?1)",
        [&now],
    )?;

    tracing::info!(
        files = summary.files_indexed,
        failed = summary.files_failed,
        sessions = summary.sessions,
        messages = summary.messages_inserted,
        "indexing complete"
    );

    Ok(summary)
}

/// Discover every log file under `config.log_dir` and index it
pub fn index_all<F>(
    db: &mut IndexerDb,
    config: &IndexerConfig,
    on_progress: F,
) -> Result<IndexSummary, IndexerError>
where
    F: FnMut(&Path, usize, usize),
{
    let files = discovery::find_log_files(config.log_dir());
    tracing::info!(count = files.len(), dir = %config.log_dir().display(), "found log files");
    index_files(db, &files, config, on_progress)
}
