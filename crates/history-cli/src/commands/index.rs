//! Index command - scan the log directory and write the database

use anyhow::{Context, Result};
use history_indexer::{index_all, IndexerConfig, IndexerDb};

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, json};

pub fn run(cli: &Cli, batch_size: usize) -> Result<()> {
    let db_path = cli.db_path();
    let log_dir = cli.log_dir();
    let format = cli.effective_format();

    if format == OutputFormat::Human {
        println!(
            "{}: {}",
            colors::label("Initializing database at"),
            db_path.display()
        );
        println!("{}: {}", colors::label("Scanning"), log_dir.display());
    }

    let mut db = IndexerDb::open_or_create(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    let config = IndexerConfig::new(log_dir).with_batch_size(batch_size);

    let step = batch_size.max(1);
    let summary = index_all(&mut db, &config, |_, done, total| {
        if format == OutputFormat::Human && (done % step == 0 || done == total) {
            eprintln!("Processing {done}/{total}...");
        }
    })?;

    match format {
        OutputFormat::Human => {
            println!();
            println!(
                "{}",
                colors::success(&format!(
                    "Indexed: {} files, {} sessions, {} messages ({} new)",
                    colors::format_count(summary.files_indexed as i64),
                    colors::format_count(summary.sessions as i64),
                    colors::format_count(summary.messages_seen as i64),
                    colors::format_count(summary.messages_inserted as i64),
                ))
            );
            if summary.lines_discarded > 0 {
                println!(
                    "  {}: {}",
                    colors::label("Lines skipped"),
                    colors::format_count(summary.lines_discarded as i64)
                );
            }
            if summary.files_failed > 0 {
                println!(
                    "{}",
                    colors::warning(&format!("Errors: {} files", summary.files_failed))
                );
            }
        }
        OutputFormat::Json => json::print(&summary, cli.pretty)?,
        OutputFormat::Minimal => println!("{}", summary.messages_inserted),
    }

    Ok(())
}
