//! Show command - replay the messages of one session

use anyhow::Result;
use history_db::{HistoryDb, SessionLookup, SessionTranscript};

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json, minimal};

pub fn run(cli: &Cli, db: &HistoryDb, prefix: &str, limit: Option<usize>) -> Result<()> {
    let lookup = db.show_session(prefix, limit)?;

    match (cli.effective_format(), lookup) {
        (OutputFormat::Json, lookup) => json::print(&lookup, cli.pretty)?,
        (_, SessionLookup::NotFound) => println!("No session found matching '{prefix}'"),
        (OutputFormat::Human, SessionLookup::Found(transcript)) => {
            print_transcript(&transcript, prefix)
        }
        (OutputFormat::Minimal, SessionLookup::Found(transcript)) => {
            for message in &transcript.messages {
                println!("{}", minimal::format_message(message));
            }
        }
    }

    Ok(())
}

fn print_transcript(transcript: &SessionTranscript, prefix: &str) {
    println!(
        "{}: {}",
        colors::label("Session"),
        colors::colored_session(&transcript.session.session_id)
    );
    if let Some(project) = transcript.session.project_name() {
        println!("{}: {}", colors::label("Project"), colors::colored_project(project));
    }
    println!(
        "{}: {}",
        colors::label("Messages"),
        colors::format_count(transcript.messages.len() as i64)
    );
    if !transcript.other_matches.is_empty() {
        println!(
            "{}",
            colors::warning(&format!(
                "{} other sessions match '{prefix}': {}",
                transcript.other_matches.len(),
                transcript.other_matches.join(", ")
            ))
        );
    }
    println!();

    for message in &transcript.messages {
        println!("{}", human::format_message(message));
        println!();
    }
}
