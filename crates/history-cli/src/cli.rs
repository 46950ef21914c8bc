//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use history_db::SortMode;
use history_indexer::config::DEFAULT_BATCH_SIZE;
use std::path::PathBuf;

/// Index and search Claude Code conversation history
#[derive(Parser, Debug)]
#[command(name = "claude-history")]
#[command(author = "Claude Code SDK")]
#[command(version)]
#[command(about = "Index and search Claude Code conversation history")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database path [default: ~/.claude/claude_history.db]
    #[arg(long, global = true, env = "CLAUDE_HISTORY_DB")]
    pub db_path: Option<PathBuf>,

    /// Directory scanned for JSONL logs [default: ~/.claude]
    #[arg(long, global = true, env = "CLAUDE_HISTORY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Pretty-print JSON (implies --format json)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn effective_format(&self) -> OutputFormat {
        if self.pretty {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// Minimal text output (content only)
    Minimal,
}

/// Search result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortArg {
    /// Newest first
    #[default]
    Recent,
    /// Best match first
    Relevance,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Recent => SortMode::Recent,
            SortArg::Relevance => SortMode::Relevance,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index every JSONL log under the log directory
    Index {
        /// Files committed per transaction
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Full-text search over message content
    Search {
        /// Search words (all must match)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Result ordering
        #[arg(long, value_enum, default_value_t = SortArg::Recent)]
        sort: SortArg,

        /// Pass the query to FTS5 as written (prefix*, OR, NOT, "exact phrase")
        #[arg(long)]
        raw: bool,

        /// Marker placed before each match
        #[arg(long)]
        open: Option<String>,

        /// Marker placed after each match
        #[arg(long)]
        close: Option<String>,
    },

    /// List recently active sessions
    Sessions {
        /// Number of sessions to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show the messages of a session
    Show {
        /// Session ID or a prefix of it
        prefix: String,

        /// Show at most N messages
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show database statistics
    Stats,

    /// Check that the search index matches the stored messages
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from([
            "claude-history",
            "search",
            "cargo",
            "build",
            "-n",
            "5",
            "--sort",
            "relevance",
        ])
        .unwrap();

        match cli.command {
            Command::Search {
                query,
                limit,
                sort,
                raw,
                ..
            } => {
                assert_eq!(query, vec!["cargo", "build"]);
                assert_eq!(limit, 5);
                assert_eq!(sort, SortArg::Relevance);
                assert!(!raw);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_search_raw_flag() {
        let cli =
            Cli::try_parse_from(["claude-history", "search", "--raw", "deploy* OR ship"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Search { raw: true, ref query, .. } if query == &["deploy* OR ship"]
        ));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["claude-history", "search"]).is_err());
    }

    #[test]
    fn test_index_defaults() {
        let cli = Cli::try_parse_from(["claude-history", "index"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Index { batch_size } if batch_size == DEFAULT_BATCH_SIZE
        ));
    }

    #[test]
    fn test_pretty_implies_json() {
        let cli = Cli::try_parse_from(["claude-history", "stats", "--pretty"]).unwrap();
        assert_eq!(cli.effective_format(), OutputFormat::Json);

        let cli = Cli::try_parse_from(["claude-history", "-f", "minimal", "stats"]).unwrap();
        assert_eq!(cli.effective_format(), OutputFormat::Minimal);
    }

    #[test]
    fn test_sort_arg_conversion() {
        assert_eq!(SortMode::from(SortArg::Recent), SortMode::Recent);
        assert_eq!(SortMode::from(SortArg::Relevance), SortMode::Relevance);
    }
}
