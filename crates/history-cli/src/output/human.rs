//! Human-readable output formatting

use super::colors::*;
use history_core::{truncate_chars, SessionSummary};
use history_db::{SearchHit, TranscriptMessage};

/// Characters of a search snippet shown per hit
pub const SNIPPET_MAX_CHARS: usize = 500;

/// Characters of a session ID shown in listings
pub const SESSION_ID_WIDTH: usize = 12;

/// Format a search hit as a separated block with a highlighted snippet
pub fn format_hit(hit: &SearchHit) -> String {
    let project = hit.project_name.as_deref().unwrap_or("?");
    let branch = hit
        .branch
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or("no-branch");

    let snippet = truncate_chars(&hit.highlighted, SNIPPET_MAX_CHARS);
    let ellipsis = if snippet.len() < hit.highlighted.len() {
        "..."
    } else {
        ""
    };

    [
        "=".repeat(60),
        format!(
            "[{}] {} | {} ({})",
            colored_time(or_unknown(truncate_chars(&hit.timestamp, 19))),
            colored_type(hit.message_type),
            colored_project(project),
            colored_branch(branch),
        ),
        format!(
            "{}: {}...",
            label("Session"),
            colored_session(truncate_chars(&hit.session_id, 8))
        ),
        "-".repeat(40),
        format!("{snippet}{ellipsis}"),
    ]
    .join("\n")
}

/// Format a session as one aligned listing row
pub fn format_session_row(session: &SessionSummary) -> String {
    let project = session.project_name().unwrap_or("?");
    let branch = if session.git_branch.is_empty() {
        "-"
    } else {
        &session.git_branch
    };

    format!(
        "{}  {:>4} msgs  {}  {}  {}",
        colored_session(&pad(truncate_chars(&session.session_id, SESSION_ID_WIDTH), SESSION_ID_WIDTH)),
        session.message_count,
        colored_time(&pad(or_unknown(truncate_chars(&session.last_ts, 16)), 16)),
        colored_project(&pad(truncate_chars(project, 20), 20)),
        colored_branch(truncate_chars(branch, 20)),
    )
}

/// Format a transcript message: a `[HH:MM:SS] ROLE [tools: ...]` header,
/// then the content
pub fn format_message(message: &TranscriptMessage) -> String {
    let time = clock_time(&message.timestamp);
    let tools = if message.tool_names.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            colored_tools(&format!("[tools: {}]", message.tool_names.join(", ")))
        )
    };

    format!(
        "[{}] {}{}\n{}",
        colored_time(time),
        colored_role(message.display_role()),
        tools,
        message.content
    )
}

/// `HH:MM:SS` portion of an ISO-8601 timestamp
pub fn clock_time(timestamp: &str) -> &str {
    timestamp
        .find('T')
        .and_then(|t| timestamp.get(t + 1..))
        .map(|rest| truncate_chars(rest, 8))
        .filter(|t| !t.is_empty())
        .unwrap_or("?")
}

fn or_unknown(s: &str) -> &str {
    if s.is_empty() {
        "?"
    } else {
        s
    }
}

/// Left-align to `width` characters
fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}
