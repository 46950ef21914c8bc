//! Stats command - database statistics

use anyhow::Result;
use history_db::HistoryDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, json};

pub fn run(cli: &Cli, db: &HistoryDb) -> Result<()> {
    let stats = db.stats()?;

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("History Database"));
            println!();
            println!("  {}: {}", colors::label("Database"), stats.db_path.display());
            println!("  {}: {}", colors::label("Size"), stats.format_size());
            println!(
                "  {}: {}",
                colors::label("Version"),
                colors::value(&stats.version.to_string())
            );
            println!();
            println!(
                "  {}: {}",
                colors::label("Sessions"),
                colors::format_count(stats.session_count)
            );
            println!(
                "  {}: {} (user: {}, assistant: {})",
                colors::label("Messages"),
                colors::format_count(stats.message_count),
                colors::format_count(stats.user_message_count),
                colors::format_count(stats.assistant_message_count)
            );

            if let Some(last) = &stats.last_indexed {
                println!();
                println!("  {}: {}", colors::label("Last indexed"), colors::value(last));
            }
        }
        OutputFormat::Json => json::print(&stats, cli.pretty)?,
        OutputFormat::Minimal => {
            println!(
                "{} {} {} {}",
                stats.session_count,
                stats.message_count,
                stats.user_message_count,
                stats.assistant_message_count
            );
        }
    }

    Ok(())
}
