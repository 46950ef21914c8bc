//! Core type definitions for history data

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::normalize::{normalize, NormalizedContent};

/// Event types that are kept during indexing.
///
/// Every other `type` value in a log line (progress, system,
/// file-history-snapshot, ...) is discarded by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    User,
    Assistant,
    Summary,
}

impl EventType {
    /// Map a raw `type` string to a kept event type
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(EventType::User),
            "assistant" => Some(EventType::Assistant),
            "summary" => Some(EventType::Summary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::User => "user",
            EventType::Assistant => "assistant",
            EventType::Summary => "summary",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content block types that can appear in a message payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse { name: String },
    ToolResult { content: Value },
    /// Thinking, image and any block type we do not index
    Other,
}

impl ContentBlock {
    /// Classify one element of a content array.
    ///
    /// Elements that are not objects, or that carry no string `type`, are
    /// not blocks and give `None`. Missing or non-string `text` and `name`
    /// fields read as empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let block = match obj.get("type")?.as_str()? {
            "text" => ContentBlock::Text { text: field("text") },
            "tool_use" => ContentBlock::ToolUse { name: field("name") },
            "tool_result" => ContentBlock::ToolResult {
                content: obj.get("content").cloned().unwrap_or(Value::Null),
            },
            _ => ContentBlock::Other,
        };
        Some(block)
    }
}

/// Message content can be a string or array of content blocks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    /// Never fails on well-formed JSON: arrays keep only the elements that
    /// are blocks, null is empty text, and any other scalar or object is
    /// kept as its compact JSON text.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let content = match Value::deserialize(deserializer)? {
            Value::String(s) => MessageContent::Text(s),
            Value::Array(items) => {
                MessageContent::Blocks(items.iter().filter_map(ContentBlock::from_value).collect())
            }
            Value::Null => MessageContent::default(),
            other => MessageContent::Text(other.to_string()),
        };
        Ok(content)
    }
}

/// Message payload carried by an event line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<MessageContent>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub model: Option<String>,
}

/// Read an optional string field without rejecting the line: null is
/// `None`, and numbers, booleans, arrays or objects become their JSON text.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Read an optional message payload; anything but an object is treated as
/// absent.
pub(crate) fn lenient_message<'de, D>(deserializer: D) -> Result<Option<EventMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// A single kept line from a history log
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub event_type: EventType,
    /// Session ID, never empty
    pub session_id: String,
    /// Message UUID (empty when the line carries none)
    pub uuid: String,
    /// Parent UUID for threading
    pub parent_uuid: Option<String>,
    /// ISO timestamp
    pub timestamp: String,
    /// Working directory
    pub cwd: String,
    pub git_branch: String,
    pub message: Option<EventMessage>,
}

/// A normalized message ready to be written to the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub uuid: String,
    pub session_id: String,
    pub parent_uuid: Option<String>,
    pub message_type: EventType,
    pub role: String,
    pub content: String,
    pub timestamp: String,
    pub model: String,
    /// Tool names in invocation order
    pub tool_names: Vec<String>,
}

impl Message {
    /// Build a message from an event, normalizing its payload
    pub fn from_event(event: &EventRecord) -> Self {
        let NormalizedContent {
            text,
            model,
            tool_names,
        } = event
            .message
            .as_ref()
            .map(normalize)
            .unwrap_or_default();

        let role = event
            .message
            .as_ref()
            .and_then(|m| m.role.clone())
            .unwrap_or_default();

        Message {
            uuid: event.uuid.clone(),
            session_id: event.session_id.clone(),
            parent_uuid: event.parent_uuid.clone(),
            message_type: event.event_type,
            role,
            content: text,
            timestamp: event.timestamp.clone(),
            model,
            tool_names,
        }
    }
}

/// Session aggregate, as accumulated in one pass or as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    /// Project path (the working directory first seen for the session)
    pub project: String,
    pub cwd: String,
    pub git_branch: String,
    pub first_ts: String,
    pub last_ts: String,
    pub message_count: i64,
}

impl SessionSummary {
    /// Last path component of the project, used as a short display name
    pub fn project_name(&self) -> Option<&str> {
        project_name(&self.project)
    }
}

/// Last path component of a project path, if any
pub fn project_name(project: &str) -> Option<&str> {
    std::path::Path::new(project)
        .file_name()
        .and_then(|n| n.to_str())
}
