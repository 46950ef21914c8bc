//! Default locations for the database and log directory

use std::path::PathBuf;

use crate::cli::Cli;

/// File name of the history database inside the Claude directory
pub const DB_FILE_NAME: &str = "claude_history.db";

/// `~/.claude`, or `.claude` relative to the working directory when no
/// home directory is known
pub fn claude_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".claude"))
        .unwrap_or_else(|| PathBuf::from(".claude"))
}

pub fn default_db_path() -> PathBuf {
    claude_dir().join(DB_FILE_NAME)
}

pub fn default_log_dir() -> PathBuf {
    claude_dir()
}

impl Cli {
    /// Database path from `--db-path` / `CLAUDE_HISTORY_DB`, or the default
    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }

    /// Log directory from `--log-dir` / `CLAUDE_HISTORY_LOG_DIR`, or the default
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }
}
