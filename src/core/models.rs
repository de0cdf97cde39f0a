//! Core data models: sessions in, blocks and omissions out.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ChatMessage;
use crate::message::MessageStyle;

/// Label used wherever a session date could not be resolved.
pub const FALLBACK_DATE: &str = "FALLBACK DATE!";

/// One play session as loaded from disk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionRecord {
    /// Session title (already resolved, falls back to the file name).
    pub title: String,
    /// Messages in chat-log order.
    pub messages: Vec<ChatMessage>,
    /// The raw session document, probed for date fields.
    pub metadata: Value,
    /// File the session was read from, if any.
    pub source: Option<PathBuf>,
}

impl SessionRecord {
    pub fn new(title: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            title: title.into(),
            messages,
            metadata: Value::Null,
            source: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// What a renderable block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Session title.
    Header,
    /// In-session section title (`### Title`).
    Subheader,
    Dialogue,
    /// Rendered dice roll summary.
    Roll,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Header => "header",
            BlockKind::Subheader => "subheader",
            BlockKind::Dialogue => "dialogue",
            BlockKind::Roll => "roll",
        };
        f.write_str(name)
    }
}

/// A unit of transcript output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Speaker for dialogue and rolls; `None` for headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub text: String,
    pub style: MessageStyle,
}

impl Block {
    pub fn header(title: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Header,
            speaker: None,
            text: title.into(),
            style: MessageStyle::Normal,
        }
    }

    pub fn subheader(title: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Subheader,
            speaker: None,
            text: title.into(),
            style: MessageStyle::Normal,
        }
    }

    pub fn dialogue(speaker: impl Into<String>, text: impl Into<String>, style: MessageStyle) -> Self {
        Self {
            kind: BlockKind::Dialogue,
            speaker: Some(speaker.into()),
            text: text.into(),
            style,
        }
    }

    pub fn roll(speaker: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Roll,
            speaker: Some(speaker.into()),
            text: summary.into(),
            style: MessageStyle::Normal,
        }
    }

    /// `"Speaker: text"` for spoken blocks, the bare text for headers.
    ///
    /// ```rust
    /// use sessionpack::core::models::Block;
    /// use sessionpack::message::MessageStyle;
    ///
    /// assert_eq!(Block::dialogue("Alice", "Hello", MessageStyle::Normal).display_line(), "Alice: Hello");
    /// assert_eq!(Block::subheader("The Vault").display_line(), "The Vault");
    /// ```
    pub fn display_line(&self) -> String {
        match &self.speaker {
            Some(speaker) => format!("{speaker}: {}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Why a message was left out of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OmissionReason {
    Afk,
    Whisper,
    Blind,
    PrivateGmRoll,
    SelfRoll,
    PublicRoll,
    Duplicate,
}

impl OmissionReason {
    /// Every reason, in report order.
    pub fn all() -> &'static [OmissionReason] {
        &[
            OmissionReason::Afk,
            OmissionReason::Whisper,
            OmissionReason::Blind,
            OmissionReason::PrivateGmRoll,
            OmissionReason::SelfRoll,
            OmissionReason::PublicRoll,
            OmissionReason::Duplicate,
        ]
    }

    /// The tag shown in reports, e.g. `PRIVATE_GM_ROLL`.
    pub fn as_str(self) -> &'static str {
        match self {
            OmissionReason::Afk => "AFK",
            OmissionReason::Whisper => "WHISPER",
            OmissionReason::Blind => "BLIND",
            OmissionReason::PrivateGmRoll => "PRIVATE_GM_ROLL",
            OmissionReason::SelfRoll => "SELF_ROLL",
            OmissionReason::PublicRoll => "PUBLIC_ROLL",
            OmissionReason::Duplicate => "DUPLICATE",
        }
    }
}

impl fmt::Display for OmissionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An audited omission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Omission {
    pub reason: OmissionReason,
    pub speaker: String,
    pub text: String,
}

impl Omission {
    pub fn new(reason: OmissionReason, speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reason,
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// The outcome for a single message. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No content; not reported anywhere.
    Dropped,
    Block(Block),
    Omitted(Omission),
}

impl Classification {
    pub fn is_dropped(&self) -> bool {
        matches!(self, Classification::Dropped)
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Classification::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_omission(&self) -> Option<&Omission> {
        match self {
            Classification::Omitted(omission) => Some(omission),
            _ => None,
        }
    }
}

/// Everything one session produced. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// 1-based position in the run.
    pub index: usize,
    pub title: String,
    /// Resolved date, e.g. `"November 14, 2023"`.
    pub date: Option<String>,
    /// Accepted blocks, starting with the session header.
    pub blocks: Vec<Block>,
    pub omissions: Vec<Omission>,
}

impl SessionOutcome {
    /// The date, or [`FALLBACK_DATE`].
    pub fn date_label(&self) -> &str {
        self.date.as_deref().unwrap_or(FALLBACK_DATE)
    }

    /// Number of omissions with the given reason.
    pub fn count(&self, reason: OmissionReason) -> usize {
        self.omissions.iter().filter(|o| o.reason == reason).count()
    }

    pub fn has_omissions(&self) -> bool {
        !self.omissions.is_empty()
    }
}
