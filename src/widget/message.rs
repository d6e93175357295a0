//! Message model
//!
//! A message is an opaque content item. Plugins decide whether they can
//! render it by inspecting its shape: the source, whether it carries text,
//! and the structured `data` payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    /// Typed by the person using the widget
    User,
    /// Produced by an automated endpoint
    Bot,
    /// Produced by a human agent on the other side
    Agent,
    /// Produced by the widget or transport itself
    System,
}

/// A single entry in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub source: MessageSource,
    /// Plain text content, absent for purely structured messages
    #[serde(default)]
    pub text: Option<String>,
    /// Structured payload for plugins
    #[serde(default)]
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message with a fresh id
    pub fn new(source: MessageSource, text: Option<String>, data: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            text,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Create a plain text user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageSource::User, Some(text.into()), Value::Null)
    }

    /// Create a plain text bot message
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageSource::Bot, Some(text.into()), Value::Null)
    }

    /// Create a system notice
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageSource::System, Some(text.into()), Value::Null)
    }

    /// Attach a structured payload
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Text content, or an empty string
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// The `data._plugin.type` discriminant hosts use to tag custom content
    pub fn plugin_type(&self) -> Option<&str> {
        self.data
            .get("_plugin")
            .and_then(|plugin| plugin.get("type"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plugin_type_reads_nested_discriminant() {
        let message = Message::bot("pick one").with_data(json!({
            "_plugin": { "type": "quick-replies", "replies": ["a", "b"] }
        }));
        assert_eq!(message.plugin_type(), Some("quick-replies"));
    }

    #[test]
    fn test_plugin_type_absent_for_plain_text() {
        assert_eq!(Message::user("hi").plugin_type(), None);
        let odd = Message::bot("x").with_data(json!({ "_plugin": { "type": 3 } }));
        assert_eq!(odd.plugin_type(), None);
    }

    #[test]
    fn test_text_defaults_to_empty() {
        let message = Message::new(MessageSource::Bot, None, json!({ "image": "a.png" }));
        assert_eq!(message.text(), "");
    }

    #[test]
    fn test_deserializes_host_json() {
        let message: Message = serde_json::from_value(json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "source": "bot",
            "text": "Hello",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(message.source, MessageSource::Bot);
        assert_eq!(message.text(), "Hello");
        assert!(message.data.is_null());
    }
}
