//! claude-history - index and search Claude Code conversation history

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use history_db::{HistoryDb, QuerySyntax, SearchOptions};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.effective_format() != OutputFormat::Human || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        // Indexing is the only command that writes
        Command::Index { batch_size } => commands::index::run(cli, *batch_size),

        Command::Search {
            query,
            limit,
            sort,
            raw,
            open,
            close,
        } => {
            let syntax = if *raw {
                QuerySyntax::Fts5
            } else {
                QuerySyntax::Literal
            };
            let options = SearchOptions::default()
                .with_limit(*limit)
                .with_sort((*sort).into())
                .with_syntax(syntax);
            commands::search::run(
                cli,
                &open_db(cli)?,
                &query.join(" "),
                options,
                open.as_deref(),
                close.as_deref(),
            )
        }

        Command::Sessions { limit } => commands::sessions::run(cli, &open_db(cli)?, *limit),

        Command::Show { prefix, limit } => {
            commands::show::run(cli, &open_db(cli)?, prefix, *limit)
        }

        Command::Stats => commands::stats::run(cli, &open_db(cli)?),

        Command::Check => commands::check::run(cli, &open_db(cli)?),
    }
}

/// Open the database read-only for the query commands
fn open_db(cli: &Cli) -> Result<HistoryDb> {
    let db_path = cli.db_path();
    let db = HistoryDb::open(&db_path)?;
    tracing::debug!(path = %db_path.display(), "opened database");
    Ok(db)
}

/// Log to stderr, `warn` by default, `debug` with `--verbose`; `RUST_LOG` overrides
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
