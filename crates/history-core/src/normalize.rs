//! Normalize message payloads into searchable text
//!
//! Handles:
//! - string content -> used verbatim
//! - text blocks -> text field
//! - tool_use blocks -> tool name only (collected, not part of the text)
//! - tool_result blocks -> first 500 chars of content

use serde::Serialize;
use serde_json::Value;

use crate::types::{ContentBlock, EventMessage, MessageContent};

/// Maximum number of characters kept from a tool result block
pub const TOOL_RESULT_MAX_CHARS: usize = 500;

/// Output of [`normalize`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedContent {
    pub text: String,
    pub model: String,
    pub tool_names: Vec<String>,
}

/// Normalize a message payload into (text, model, tool names)
pub fn normalize(message: &EventMessage) -> NormalizedContent {
    let model = message.model.clone().unwrap_or_default();

    let (text, tool_names) = match &message.content {
        None => (String::new(), Vec::new()),
        Some(MessageContent::Text(s)) => (s.clone(), Vec::new()),
        Some(MessageContent::Blocks(blocks)) => {
            let mut parts: Vec<String> = Vec::new();
            let mut tool_names = Vec::new();

            for block in blocks {
                match block {
                    ContentBlock::Text { text } => parts.push(text.clone()),
                    ContentBlock::ToolUse { name } => tool_names.push(name.clone()),
                    ContentBlock::ToolResult { content } => {
                        let text = tool_result_text(content);
                        parts.push(truncate_chars(&text, TOOL_RESULT_MAX_CHARS).to_string());
                    }
                    ContentBlock::Other => {}
                }
            }

            (parts.join("\n"), tool_names)
        }
    };

    NormalizedContent {
        text,
        model,
        tool_names,
    }
}

/// Coerce a tool result payload to text.
///
/// Strings are used as-is, null becomes empty, anything else is
/// rendered as compact JSON.
fn tool_result_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Truncate a string to at most `max_chars` characters
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(content: Value) -> EventMessage {
        serde_json::from_value(json!({
            "role": "assistant",
            "content": content,
            "model": "claude-3"
        }))
        .unwrap()
    }

    #[test]
    fn test_string_content_verbatim() {
        let msg = message(json!("  Hello\nworld  "));
        let out = normalize(&msg);
        assert_eq!(out.text, "  Hello\nworld  ");
        assert_eq!(out.model, "claude-3");
        assert!(out.tool_names.is_empty());
    }

    #[test]
    fn test_text_blocks_joined_in_order() {
        let msg = message(json!([
            {"type": "text", "text": "first"},
            {"type": "text", "text": "second"},
            {"type": "text", "text": "third"}
        ]));
        assert_eq!(normalize(&msg).text, "first\nsecond\nthird");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let msg = message(json!([
            {"type": "text", "text": "alpha"},
            {"type": "tool_use", "name": "Read"},
            {"type": "tool_result", "content": "beta"}
        ]));
        let first = normalize(&msg);
        let second = normalize(&msg);
        assert_eq!(first, second);
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
    }

    #[test]
    fn test_tool_names_ordered_with_repeats() {
        let msg = message(json!([
            {"type": "tool_use", "id": "1", "name": "A", "input": {}},
            {"type": "text", "text": "between"},
            {"type": "tool_use", "id": "2", "name": "B", "input": {}},
            {"type": "tool_use", "id": "3", "name": "C", "input": {}},
            {"type": "tool_use", "id": "4", "name": "A", "input": {}}
        ]));
        let out = normalize(&msg);
        assert_eq!(out.tool_names, vec!["A", "B", "C", "A"]);
        assert_eq!(out.text, "between");
    }

    #[test]
    fn test_tool_result_truncated_to_500_chars() {
        let long = "x".repeat(1200);
        let msg = message(json!([{"type": "tool_result", "content": long}]));
        let out = normalize(&msg);
        assert_eq!(out.text.chars().count(), TOOL_RESULT_MAX_CHARS);
        assert_eq!(out.text, "x".repeat(500));
    }

    #[test]
    fn test_tool_result_truncation_counts_chars_not_bytes() {
        let long = "é".repeat(600);
        let msg = message(json!([{"type": "tool_result", "content": long}]));
        let out = normalize(&msg);
        assert_eq!(out.text, "é".repeat(500));
    }

    #[test]
    fn test_tool_result_at_limit_untouched() {
        let exact = "y".repeat(500);
        let msg = message(json!([{"type": "tool_result", "content": exact.clone()}]));
        assert_eq!(normalize(&msg).text, exact);
    }

    #[test]
    fn test_tool_result_non_string_content() {
        let msg = message(json!([
            {"type": "tool_result", "content": [{"type": "text", "text": "ok"}]}
        ]));
        assert_eq!(normalize(&msg).text, r#"[{"text":"ok","type":"text"}]"#);
    }

    #[test]
    fn test_mixed_blocks() {
        let msg = message(json!([
            {"type": "text", "text": "Let me check"},
            {"type": "tool_use", "name": "Bash"},
            {"type": "tool_result", "content": "file.txt"},
            {"type": "thinking", "thinking": "not indexed"}
        ]));
        let out = normalize(&msg);
        assert_eq!(out.text, "Let me check\nfile.txt");
        assert_eq!(out.tool_names, vec!["Bash"]);
    }

    #[test]
    fn test_missing_content() {
        let msg: EventMessage = serde_json::from_value(json!({"role": "user"})).unwrap();
        let out = normalize(&msg);
        assert_eq!(out, NormalizedContent::default());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }
}
