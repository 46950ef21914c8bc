//! Search command - full-text search across messages

use anyhow::Result;
use colored::Colorize;
use history_db::{HighlightMarkers, HistoryDb, SearchOptions};

use crate::cli::{Cli, OutputFormat};
use crate::output::{human, json, minimal};

const MATCH_START: char = '\u{1}';
const MATCH_END: char = '\u{2}';

pub fn run(
    cli: &Cli,
    db: &HistoryDb,
    query: &str,
    options: SearchOptions,
    open: Option<&str>,
    close: Option<&str>,
) -> Result<()> {
    let format = cli.effective_format();

    // Terminal highlighting replaces the markers in colored human output
    let colorize = format == OutputFormat::Human
        && open.is_none()
        && close.is_none()
        && colored::control::SHOULD_COLORIZE.should_colorize();

    let defaults = HighlightMarkers::default();
    let markers = if colorize {
        HighlightMarkers::new(MATCH_START, MATCH_END)
    } else {
        HighlightMarkers::new(
            open.unwrap_or(&defaults.open),
            close.unwrap_or(&defaults.close),
        )
    };

    let options = options.with_markers(markers);
    let hits = db.search(query, &options)?;

    match format {
        OutputFormat::Human => {
            if hits.is_empty() {
                println!("No results found.");
                return Ok(());
            }

            for hit in &hits {
                let block = human::format_hit(hit);
                println!();
                if colorize {
                    println!("{}", paint_matches(&block));
                } else {
                    println!("{block}");
                }
            }
            println!();
            println!("{} results", hits.len());
        }
        OutputFormat::Json => json::print(&hits, cli.pretty)?,
        OutputFormat::Minimal => {
            for hit in &hits {
                println!("{}", minimal::format_hit(hit));
            }
        }
    }

    Ok(())
}

/// Replace marked spans with terminal highlighting.
///
/// A span cut off by snippet truncation is left unhighlighted.
fn paint_matches(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(MATCH_START) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MATCH_START.len_utf8()..];
        match after.find(MATCH_END) {
            Some(end) => {
                out.push_str(&after[..end].black().on_yellow().to_string());
                rest = &after[end + MATCH_END.len_utf8()..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
