//! Chat message records as stored in a session export.
//!
//! This module provides [`ChatMessage`], the deserialized form of one entry in
//! a session file's `messages` array. Messages are read-only input: the
//! classification pipeline never mutates them.
//!
//! # Overview
//!
//! A message consists of:
//! - **Content**: `content` (HTML, may be absent) and `flavor` (HTML caption)
//! - **Author**: `speaker.alias`
//! - **Visibility**: `whisper` targets, the `blind` flag and `rollMode`
//! - **Presentation**: `style` (normal, narration, roll)
//!
//! # Examples
//!
//! ```
//! use sessionpack::ChatMessage;
//!
//! let msg = ChatMessage::new("Alice", "<p>Hello</p>");
//! assert_eq!(msg.alias(), Some("Alice"));
//! assert!(!msg.is_whisper());
//! ```
//!
//! Parsing a raw record:
//!
//! ```
//! use sessionpack::ChatMessage;
//!
//! let json = r#"{"content": "<p>Psst</p>", "speaker": {"alias": "Bob"}, "whisper": ["gm-id"]}"#;
//! let msg: ChatMessage = serde_json::from_str(json)?;
//! assert!(msg.is_whisper());
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// How a message should be presented.
///
/// Exports store this as a small integer. Values outside the known set are
/// read as [`Normal`](MessageStyle::Normal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageStyle {
    /// Ordinary dialogue (`0`).
    #[default]
    Normal,
    /// In-character narration, rendered emphasized (`1`).
    Narration,
    /// Dice roll card (`2`).
    Roll,
}

impl MessageStyle {
    /// Returns the numeric code used in exports.
    pub fn code(self) -> u8 {
        match self {
            MessageStyle::Normal => 0,
            MessageStyle::Narration => 1,
            MessageStyle::Roll => 2,
        }
    }

    /// Returns `true` for narration.
    pub fn is_narration(self) -> bool {
        self == MessageStyle::Narration
    }
}

impl From<u64> for MessageStyle {
    fn from(code: u64) -> Self {
        match code {
            1 => MessageStyle::Narration,
            2 => MessageStyle::Roll,
            _ => MessageStyle::Normal,
        }
    }
}

impl Serialize for MessageStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for MessageStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| v.as_u64())
            .map(MessageStyle::from)
            .unwrap_or_default())
    }
}

/// Author information attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Speaker {
    /// Display name shown in the chat log.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// One chat-log entry from a session export.
///
/// | Field | JSON key | Notes |
/// |-------|----------|-------|
/// | `content` | `content` | HTML; `None` when absent or `null` |
/// | `flavor` | `flavor` | HTML caption, empty when absent |
/// | `speaker` | `speaker` | `{ "alias": ... }` |
/// | `style` | `style` | `0` normal, `1` narration, `2` roll |
/// | `whisper` | `whisper` | recipient ids, empty when public |
/// | `blind` | `blind` | hidden from the roller |
/// | `roll_mode` | `rollMode` | `gmroll`, `blindroll`, `selfroll`, `publicroll`, ... |
///
/// Every field is read leniently so one odd record cannot fail a session.
/// Numbers and booleans where text is expected are kept as their JSON text,
/// objects and arrays there are ignored. Whisper entries of any type count as
/// recipients and a non-empty string counts as one. `blind` also accepts
/// `"true"`/`"yes"`/`"1"` and non-zero numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub flavor: String,

    #[serde(default, deserialize_with = "lenient_speaker", skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Speaker>,

    #[serde(default)]
    pub style: MessageStyle,

    #[serde(default, deserialize_with = "lenient_recipients")]
    pub whisper: Vec<String>,

    #[serde(default, deserialize_with = "lenient_flag")]
    pub blind: bool,

    #[serde(
        default,
        rename = "rollMode",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub roll_mode: Option<String>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

fn lenient_speaker<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Speaker>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(mut fields)) => Some(Speaker {
            alias: fields.remove("alias").and_then(scalar_text),
        }),
        _ => None,
    })
}

fn lenient_recipients<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    })
}

impl ChatMessage {
    /// Creates a public, normal-style message.
    pub fn new(alias: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            speaker: Some(Speaker {
                alias: Some(alias.into()),
            }),
            ..Self::default()
        }
    }

    /// Creates a message with no speaker alias.
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: MessageStyle) -> Self {
        self.style = style;
        self
    }

    /// Adds a whisper recipient.
    #[must_use]
    pub fn with_whisper(mut self, recipient: impl Into<String>) -> Self {
        self.whisper.push(recipient.into());
        self
    }

    #[must_use]
    pub fn with_blind(mut self, blind: bool) -> Self {
        self.blind = blind;
        self
    }

    #[must_use]
    pub fn with_roll_mode(mut self, mode: impl Into<String>) -> Self {
        self.roll_mode = Some(mode.into());
        self
    }

    /// Clears the content, as in a record whose `content` is `null`.
    #[must_use]
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the raw HTML content, if present.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the speaker alias when it is present and not blank.
    pub fn alias(&self) -> Option<&str> {
        self.speaker
            .as_ref()
            .and_then(|s| s.alias.as_deref())
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Returns the speaker alias, or `default` when there is none.
    pub fn speaker_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.alias().unwrap_or(default)
    }

    /// Returns `true` if the message has at least one whisper recipient.
    pub fn is_whisper(&self) -> bool {
        !self.whisper.is_empty()
    }

    /// Returns the roll mode, if any.
    pub fn roll_mode(&self) -> Option<&str> {
        self.roll_mode.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "content": "<p>Hi</p>",
            "flavor": "<b>Perception</b>",
            "speaker": {"alias": "Alice", "actor": "abc"},
            "style": 1,
            "whisper": ["u1", "u2"],
            "blind": true,
            "rollMode": "gmroll"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content(), Some("<p>Hi</p>"));
        assert_eq!(msg.flavor, "<b>Perception</b>");
        assert_eq!(msg.alias(), Some("Alice"));
        assert_eq!(msg.style, MessageStyle::Narration);
        assert_eq!(msg.whisper.len(), 2);
        assert!(msg.blind);
        assert_eq!(msg.roll_mode(), Some("gmroll"));
    }

    #[test]
    fn test_deserialize_nulls_and_missing() {
        let json = r#"{"content": null, "flavor": null, "whisper": null, "blind": null, "style": null}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.content().is_none());
        assert!(msg.flavor.is_empty());
        assert!(msg.whisper.is_empty());
        assert!(!msg.blind);
        assert_eq!(msg.style, MessageStyle::Normal);
        assert!(msg.alias().is_none());
    }

    #[test]
    fn test_unknown_style_is_normal() {
        let msg: ChatMessage = serde_json::from_str(r#"{"content": "x", "style": 5}"#).unwrap();
        assert_eq!(msg.style, MessageStyle::Normal);

        let msg: ChatMessage = serde_json::from_str(r#"{"content": "x", "style": "ooc"}"#).unwrap();
        assert_eq!(msg.style, MessageStyle::Normal);
    }

    #[test]
    fn test_is_narration() {
        assert!(MessageStyle::Narration.is_narration());
        assert!(!MessageStyle::Normal.is_narration());
        assert!(!MessageStyle::Roll.is_narration());
    }

    #[test]
    fn test_style_serializes_as_code() {
        let msg = ChatMessage::new("A", "x").with_style(MessageStyle::Roll);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"style\":2"));
    }

    #[test]
    fn test_blank_alias_falls_back() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"content": "x", "speaker": {"alias": "   "}}"#).unwrap();
        assert_eq!(msg.speaker_or("Handler"), "Handler");
        assert_eq!(ChatMessage::new(" Bob ", "x").speaker_or("Handler"), "Bob");
    }

    #[test]
    fn test_builders() {
        let msg = ChatMessage::anonymous("x")
            .with_whisper("gm")
            .with_blind(true)
            .with_roll_mode("selfroll")
            .with_flavor("Stealth");
        assert!(msg.is_whisper());
        assert!(msg.blind);
        assert_eq!(msg.roll_mode(), Some("selfroll"));
        assert_eq!(msg.flavor, "Stealth");
        assert!(msg.without_content().content().is_none());
    }

    #[test]
    fn test_odd_field_types_are_lenient() {
        let json = r#"{
            "content": 5,
            "flavor": {"html": "x"},
            "speaker": {"alias": 42},
            "whisper": [{"_id": "u1"}, null, "u2"],
            "blind": "true",
            "rollMode": ["gmroll"]
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content(), Some("5"));
        assert!(msg.flavor.is_empty());
        assert_eq!(msg.alias(), Some("42"));
        assert_eq!(msg.whisper, vec![r#"{"_id":"u1"}"#.to_string(), "u2".to_string()]);
        assert!(msg.blind);
        assert!(msg.roll_mode().is_none());
    }

    #[test]
    fn test_scalar_whisper_and_flags() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"content": "x", "whisper": "gm-id", "blind": 0, "speaker": "Bob"}"#).unwrap();
        assert_eq!(msg.whisper, vec!["gm-id".to_string()]);
        assert!(!msg.blind);
        assert!(msg.speaker.is_none());

        let msg: ChatMessage =
            serde_json::from_str(r#"{"content": "x", "whisper": "  ", "blind": "no"}"#).unwrap();
        assert!(!msg.is_whisper());
        assert!(!msg.blind);
    }
}
