//! Sessions command - list recently active sessions

use anyhow::Result;
use history_db::HistoryDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json, minimal};

pub fn run(cli: &Cli, db: &HistoryDb, limit: usize) -> Result<()> {
    let sessions = db.list_sessions(limit)?;

    match cli.effective_format() {
        OutputFormat::Human => {
            if sessions.is_empty() {
                println!("No sessions found");
            } else {
                println!(
                    "{}",
                    colors::header(&format!("Sessions ({})", sessions.len()))
                );
                println!();
                for session in &sessions {
                    println!("{}", human::format_session_row(session));
                }
            }
        }
        OutputFormat::Json => json::print(&sessions, cli.pretty)?,
        OutputFormat::Minimal => {
            for session in &sessions {
                println!("{}", minimal::format_session(session));
            }
        }
    }

    Ok(())
}
