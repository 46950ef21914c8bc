//! Minimal text output formatting

use history_core::SessionSummary;
use history_db::{SearchHit, TranscriptMessage};

/// Search hit as its raw content, on one line
pub fn format_hit(hit: &SearchHit) -> String {
    one_line(&hit.content)
}

/// Session as its full ID
pub fn format_session(session: &SessionSummary) -> String {
    session.session_id.clone()
}

/// Transcript message as `role: content`, on one line
pub fn format_message(message: &TranscriptMessage) -> String {
    format!("{}: {}", message.display_role(), one_line(&message.content))
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("a\n  b\tc "), "a b c");
        assert_eq!(one_line(""), "");
    }
}
