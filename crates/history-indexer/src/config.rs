//! Indexer configuration

use std::path::{Path, PathBuf};

/// Number of files committed per transaction
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Settings for an indexing run, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    /// Directory searched recursively for `*.jsonl` logs
    pub log_dir: PathBuf,
    /// Files per committed batch (values below 1 are treated as 1)
    pub batch_size: usize,
}

impl IndexerConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub(crate) fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
