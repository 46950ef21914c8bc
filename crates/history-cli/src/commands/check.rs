//! Check command - compare stored messages with the search index

use anyhow::{bail, Result};
use history_db::HistoryDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, json};

pub fn run(cli: &Cli, db: &HistoryDb) -> Result<()> {
    let health = db.health()?;
    let consistent = health.is_consistent();

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("Search Index Check"));
            println!();

            let rows = [
                ("Messages", health.messages),
                ("Index entries", health.index_entries),
                ("Missing from index", health.missing_entries),
                ("Orphaned index entries", health.orphaned_entries),
                ("Duplicate index entries", health.duplicate_entries),
            ];
            for (name, count) in rows {
                println!("  {}: {}", colors::label(name), colors::format_count(count));
            }
            println!();

            if consistent {
                println!("{}", colors::success("Index matches stored messages"));
            } else {
                println!("{}", colors::error("Index is out of sync with stored messages"));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "consistent": consistent,
                "health": health,
            });
            json::print(&output, cli.pretty)?;
        }
        OutputFormat::Minimal => println!("{}", if consistent { "ok" } else { "inconsistent" }),
    }

    if !consistent {
        bail!("search index is inconsistent");
    }
    Ok(())
}
