//! ANSI color helpers for terminal output

use colored::Colorize;
use history_core::EventType;

/// Get colored message type indicator
pub fn colored_type(message_type: EventType) -> String {
    match message_type {
        EventType::User => "user".cyan().to_string(),
        EventType::Assistant => "assistant".green().to_string(),
        EventType::Summary => "summary".magenta().to_string(),
    }
}

/// Get colored role label, upper-cased as in transcripts
pub fn colored_role(role: &str) -> String {
    let upper = role.to_uppercase();
    match role {
        "user" => upper.cyan().bold().to_string(),
        "assistant" => upper.green().bold().to_string(),
        _ => upper.magenta().bold().to_string(),
    }
}

/// Get colored timestamp
pub fn colored_time(timestamp: &str) -> String {
    timestamp.white().dimmed().to_string()
}

/// Get colored session ID
pub fn colored_session(id: &str) -> String {
    id.cyan().bold().to_string()
}

/// Get colored project name
pub fn colored_project(name: &str) -> String {
    name.blue().to_string()
}

/// Get colored branch name
pub fn colored_branch(name: &str) -> String {
    name.yellow().to_string()
}

/// Get colored tool list
pub fn colored_tools(tools: &str) -> String {
    tools.magenta().to_string()
}

/// Get colored header
pub fn header(text: &str) -> String {
    text.bold().underline().to_string()
}

/// Get colored label
pub fn label(text: &str) -> String {
    text.white().dimmed().to_string()
}

/// Get colored value
pub fn value(text: &str) -> String {
    text.white().to_string()
}

/// Get colored success message
pub fn success(text: &str) -> String {
    format!("{} {}", "✓".green(), text)
}

/// Get colored warning message
pub fn warning(text: &str) -> String {
    format!("{} {}", "⚠".yellow(), text)
}

/// Get colored error message
pub fn error(text: &str) -> String {
    format!("{} {}", "✗".red(), text)
}

/// Format count with comma separators
pub fn format_count(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    if n < 0 {
        result.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
