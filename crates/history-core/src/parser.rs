//! JSONL parsing for history log lines
//!
//! Every line yields a [`LineOutcome`]: either a kept [`EventRecord`] or a
//! discard reason. Discards are never errors; they are tallied per file in a
//! [`LineReport`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::BufRead;

use crate::types::{lenient_message, lenient_string, EventMessage, EventRecord, EventType};

/// Why a line was not kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Empty or whitespace-only line
    Blank,
    /// Not valid JSON
    Malformed,
    /// `type` missing or not one of user/assistant/summary
    UnsupportedType,
    /// `sessionId` missing or empty
    MissingSessionId,
}

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Kept(EventRecord),
    Discarded(DiscardReason),
}

impl LineOutcome {
    pub fn into_event(self) -> Option<EventRecord> {
        match self {
            LineOutcome::Kept(event) => Some(event),
            LineOutcome::Discarded(_) => None,
        }
    }
}

/// Per-file tally of line outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub kept: usize,
    pub blank: usize,
    pub malformed: usize,
    pub unsupported_type: usize,
    pub missing_session_id: usize,
}

impl LineReport {
    pub fn record(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Kept(_) => self.kept += 1,
            LineOutcome::Discarded(DiscardReason::Blank) => self.blank += 1,
            LineOutcome::Discarded(DiscardReason::Malformed) => self.malformed += 1,
            LineOutcome::Discarded(DiscardReason::UnsupportedType) => self.unsupported_type += 1,
            LineOutcome::Discarded(DiscardReason::MissingSessionId) => {
                self.missing_session_id += 1
            }
        }
    }

    /// Lines that were not kept, blank lines excluded
    pub fn discarded(&self) -> usize {
        self.malformed + self.unsupported_type + self.missing_session_id
    }

    pub fn merge(&mut self, other: &LineReport) {
        self.kept += other.kept;
        self.blank += other.blank;
        self.malformed += other.malformed;
        self.unsupported_type += other.unsupported_type;
        self.missing_session_id += other.missing_session_id;
    }
}

/// Wire shape of a log line, after the type and session checks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    parent_uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    cwd: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    git_branch: Option<String>,
    #[serde(default, deserialize_with = "lenient_message")]
    message: Option<EventMessage>,
}

/// Parse a single JSONL line into a kept event or a discard reason
pub fn parse_line(raw: &str) -> LineOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LineOutcome::Discarded(DiscardReason::Blank);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => return LineOutcome::Discarded(DiscardReason::Malformed),
    };

    let Some(event_type) = value
        .get("type")
        .and_then(|t| t.as_str())
        .and_then(EventType::from_raw)
    else {
        return LineOutcome::Discarded(DiscardReason::UnsupportedType);
    };

    let session_id = match value.get("sessionId").and_then(|s| s.as_str()) {
        Some(sid) if !sid.is_empty() => sid.to_string(),
        _ => return LineOutcome::Discarded(DiscardReason::MissingSessionId),
    };

    let raw_event: RawEvent = match serde_json::from_value(value) {
        Ok(e) => e,
        Err(_) => return LineOutcome::Discarded(DiscardReason::Malformed),
    };

    LineOutcome::Kept(EventRecord {
        event_type,
        session_id,
        uuid: raw_event.uuid.unwrap_or_default(),
        parent_uuid: raw_event.parent_uuid,
        timestamp: raw_event.timestamp.unwrap_or_default(),
        cwd: raw_event.cwd.unwrap_or_default(),
        git_branch: raw_event.git_branch.unwrap_or_default(),
        message: raw_event.message,
    })
}

/// Parse a single line, dropping discarded lines
pub fn parse(raw: &str) -> Option<EventRecord> {
    parse_line(raw).into_event()
}

/// Parse every line from a reader.
///
/// Bad lines are discarded and counted; an I/O error while reading aborts
/// the whole read so no partial file is ever returned.
pub fn parse_reader<R: BufRead>(reader: R) -> std::io::Result<(Vec<EventRecord>, LineReport)> {
    let mut events = Vec::new();
    let mut report = LineReport::default();

    for line_result in reader.lines() {
        let line = line_result?;
        let outcome = parse_line(&line);
        report.record(&outcome);
        if let LineOutcome::Kept(event) = outcome {
            events.push(event);
        }
    }

    Ok((events, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageContent;

    #[test]
    fn test_parse_user_line() {
        let raw = r#"{"type":"user","uuid":"abc","sessionId":"123","timestamp":"2024-01-01T00:00:00Z","cwd":"/work/app","gitBranch":"main","message":{"role":"user","content":"Hello"}}"#;
        let event = parse(raw).unwrap();
        assert_eq!(event.event_type, EventType::User);
        assert_eq!(event.session_id, "123");
        assert_eq!(event.uuid, "abc");
        assert_eq!(event.cwd, "/work/app");
        assert_eq!(event.git_branch, "main");
        assert_eq!(
            event.message.unwrap().content,
            Some(MessageContent::Text("Hello".into()))
        );
    }

    #[test]
    fn test_parse_assistant_line() {
        let raw = r#"{"type":"assistant","uuid":"def","parentUuid":"abc","sessionId":"123","timestamp":"2024-01-01T00:00:01Z","message":{"role":"assistant","model":"claude-3","content":[{"type":"text","text":"Hi there!"}]}}"#;
        let event = parse(raw).unwrap();
        assert_eq!(event.event_type, EventType::Assistant);
        assert_eq!(event.parent_uuid.as_deref(), Some("abc"));
        assert_eq!(event.message.unwrap().model.as_deref(), Some("claude-3"));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line(""), LineOutcome::Discarded(DiscardReason::Blank));
        assert_eq!(parse_line("   \t"), LineOutcome::Discarded(DiscardReason::Blank));
    }

    #[test]
    fn test_malformed_line() {
        assert_eq!(
            parse_line("not valid json"),
            LineOutcome::Discarded(DiscardReason::Malformed)
        );
        assert_eq!(
            parse_line(r#"{"type":"user","sessionId":"s1""#),
            LineOutcome::Discarded(DiscardReason::Malformed)
        );
    }

    #[test]
    fn test_stray_content_elements_keep_the_line() {
        let raw = r#"{"type":"assistant","sessionId":"s1","uuid":"u1","message":{"content":[{"type":"text","text":"hi"},"stray"]}}"#;
        let LineOutcome::Kept(event) = parse_line(raw) else {
            panic!("line should be kept");
        };
        let message = crate::types::Message::from_event(&event);
        assert_eq!(message.content, "hi");
    }

    #[test]
    fn test_odd_payload_shapes_keep_the_line() {
        for raw in [
            r#"{"type":"user","sessionId":"s1","message":{"content":[{"type":"text","text":null}]}}"#,
            r#"{"type":"user","sessionId":"s1","message":{"content":[{"type":"tool_use","name":"Bash"},{"text":"untyped"}]}}"#,
            r#"{"type":"user","sessionId":"s1","message":{"content":42}}"#,
            r#"{"type":"user","sessionId":"s1","message":"not an object"}"#,
            r#"{"type":"user","sessionId":"s1","uuid":7,"cwd":null}"#,
        ] {
            assert!(matches!(parse_line(raw), LineOutcome::Kept(_)), "{raw}");
        }

        let event = parse(r#"{"type":"user","sessionId":"s1","message":{"content":42}}"#).unwrap();
        assert_eq!(crate::types::Message::from_event(&event).content, "42");

        let event = parse(r#"{"type":"user","sessionId":"s1","uuid":7}"#).unwrap();
        assert_eq!(event.uuid, "7");
    }

    #[test]
    fn test_unsupported_types() {
        for raw in [
            r#"{"type":"progress","sessionId":"s1"}"#,
            r#"{"type":"system","sessionId":"s1"}"#,
            r#"{"type":"file-history-snapshot","sessionId":"s1"}"#,
            r#"{"sessionId":"s1"}"#,
            r#"[1,2,3]"#,
        ] {
            assert_eq!(
                parse_line(raw),
                LineOutcome::Discarded(DiscardReason::UnsupportedType),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_missing_session_id() {
        assert_eq!(
            parse_line(r#"{"type":"summary","summary":"x","leafUuid":"u"}"#),
            LineOutcome::Discarded(DiscardReason::MissingSessionId)
        );
        assert_eq!(
            parse_line(r#"{"type":"user","sessionId":""}"#),
            LineOutcome::Discarded(DiscardReason::MissingSessionId)
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw = r#"{"type":"user","sessionId":"s1","uuid":"u1","version":"1.0","toolUseResult":{"x":1}}"#;
        let event = parse(raw).unwrap();
        assert_eq!(event.uuid, "u1");
        assert!(event.message.is_none());
    }

    #[test]
    fn test_parse_reader_tallies_outcomes() {
        let input = concat!(
            r#"{"type":"user","sessionId":"s1","uuid":"u1","message":{"content":"a"}}"#,
            "\n\n",
            "garbage\n",
            r#"{"type":"progress","sessionId":"s1"}"#,
            "\n",
            r#"{"type":"user","uuid":"u9"}"#,
            "\n",
            r#"{"type":"assistant","sessionId":"s1","uuid":"u2","message":{"content":"b"}}"#,
            "\n",
        );

        let (events, report) = parse_reader(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            report,
            LineReport {
                kept: 2,
                blank: 1,
                malformed: 1,
                unsupported_type: 1,
                missing_session_id: 1,
            }
        );
        assert_eq!(report.discarded(), 3);
    }

    #[test]
    fn test_parse_reader_aborts_on_invalid_utf8() {
        let input: &[u8] = b"{\"type\":\"user\",\"sessionId\":\"s1\"}\n\xff\xfe\n";
        assert!(parse_reader(input).is_err());
    }
}
