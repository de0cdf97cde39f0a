//! The session classification driver.
//!
//! [`Classifier`] walks one session's messages in order and gives each
//! exactly one [`Classification`]. Rules are tried in a fixed order and the
//! first that applies decides:
//!
//! | # | Rule | Result | Duplicate key |
//! |---|------|--------|---------------|
//! | 1 | content empty after normalization | `Dropped` | reset |
//! | 2 | AFK pattern matches (`omit_afk`) | `Omitted(AFK)` | kept |
//! | 3 | `### Title` (`subhead_bookmarks`) | `Block(Subheader)` | reset |
//! | 4 | whisper / blind / roll mode | `Omitted(..)` | kept |
//! | 5 | same `(speaker, text)` as last accepted | `Omitted(DUPLICATE)` | kept |
//! | 6 | roll card | `Block(Roll)` | set to rendered summary |
//! | 7 | anything else | `Block(Dialogue)` | set |
//!
//! Only accepted text feeds duplicate detection: an omitted message is never
//! what a later message gets compared against.
//!
//! # Example
//!
//! ```rust
//! use sessionpack::ChatMessage;
//! use sessionpack::config::PipelineConfig;
//! use sessionpack::core::pipeline::classify_messages;
//!
//! let messages = vec![
//!     ChatMessage::new("Alice", "<p>Hello</p>"),
//!     ChatMessage::new("Alice", "<p>Hello</p>"),
//!     ChatMessage::new("Alice", ""),
//!     ChatMessage::new("Alice", "<p>Hello</p>"),
//! ];
//!
//! let results = classify_messages(&messages, &PipelineConfig::default());
//! let lines: Vec<_> = results.iter().filter_map(|c| c.as_block()).map(|b| b.display_line()).collect();
//! assert_eq!(lines, ["Alice: Hello", "Alice: Hello"]);
//! assert_eq!(results.iter().filter(|c| c.as_omission().is_some()).count(), 1);
//! ```

use regex::Regex;
use tracing::{debug, info};

use crate::ChatMessage;
use crate::config::PipelineConfig;

use super::classify::{is_afk, subheader_title, visibility_omission};
use super::date::session_date_label;
use super::models::{Block, Classification, Omission, OmissionReason, SessionOutcome, SessionRecord};
use super::normalize::normalize_text;
use super::roll::render_roll;

/// The last accepted `(speaker, text)` pair of a session.
///
/// Holds at most one pair. Overwritten, never appended to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateKey {
    last: Option<(String, String)>,
}

impl DuplicateKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `(speaker, text)` equals the stored pair after trimming.
    pub fn matches(&self, speaker: &str, text: &str) -> bool {
        self.last
            .as_ref()
            .is_some_and(|(s, t)| s == speaker.trim() && t == text.trim())
    }

    pub fn set(&mut self, speaker: &str, text: &str) {
        self.last = Some((speaker.trim().to_string(), text.trim().to_string()));
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn get(&self) -> Option<(&str, &str)> {
        self.last.as_ref().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}

/// Classifies the messages of one session.
///
/// Create one per session: the duplicate key starts empty and lives as long
/// as the classifier.
#[derive(Debug)]
pub struct Classifier<'a> {
    config: &'a PipelineConfig,
    afk: Regex,
    last_key: DuplicateKey,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            afk: config.afk_regex(),
            last_key: DuplicateKey::new(),
        }
    }

    /// The current duplicate key.
    pub fn last_key(&self) -> &DuplicateKey {
        &self.last_key
    }

    /// Classifies the next message of the session.
    pub fn classify(&mut self, msg: &ChatMessage) -> Classification {
        let text = normalize_text(msg.content());
        if text.is_empty() {
            self.last_key.reset();
            return Classification::Dropped;
        }

        let speaker = msg.speaker_or(&self.config.default_speaker).trim().to_string();

        if let Some(result) = self.afk_rule(&speaker, &text) {
            return result;
        }
        if let Some(result) = self.subheader_rule(&text) {
            return result;
        }
        if let Some(result) = self.visibility_rule(msg, &speaker, &text) {
            return result;
        }
        self.accept(msg, speaker, text)
    }

    fn afk_rule(&self, speaker: &str, text: &str) -> Option<Classification> {
        if !self.config.omit_afk || !is_afk(text, &self.afk) {
            return None;
        }
        Some(omit(OmissionReason::Afk, speaker, text))
    }

    fn subheader_rule(&mut self, text: &str) -> Option<Classification> {
        if !self.config.subhead_bookmarks {
            return None;
        }
        let title = subheader_title(text)?;
        self.last_key.reset();
        Some(Classification::Block(Block::subheader(title)))
    }

    fn visibility_rule(&self, msg: &ChatMessage, speaker: &str, text: &str) -> Option<Classification> {
        visibility_omission(msg, self.config).map(|reason| omit(reason, speaker, text))
    }

    /// Duplicate check, then roll or dialogue block.
    ///
    /// A roll's key is its rendered summary, so two cards that render the
    /// same line are duplicates even if their HTML differs.
    fn accept(&mut self, msg: &ChatMessage, speaker: String, text: String) -> Classification {
        let summary = render_roll(&speaker, msg.content().unwrap_or_default(), &msg.flavor);
        let key_text = summary.as_deref().unwrap_or(&text);

        if self.last_key.matches(&speaker, key_text) {
            return omit(OmissionReason::Duplicate, &speaker, key_text);
        }
        self.last_key.set(&speaker, key_text);

        let block = match summary {
            Some(summary) => Block::roll(speaker, summary),
            None => Block::dialogue(speaker, text, msg.style),
        };
        Classification::Block(block)
    }
}

fn omit(reason: OmissionReason, speaker: &str, text: &str) -> Classification {
    debug!(%reason, speaker, "omitting message");
    Classification::Omitted(Omission::new(reason, speaker, text))
}

/// Classifies a session's messages with a fresh duplicate key.
///
/// Returns one result per input message, in input order.
pub fn classify_messages(messages: &[ChatMessage], config: &PipelineConfig) -> Vec<Classification> {
    let mut classifier = Classifier::new(config);
    messages.iter().map(|msg| classifier.classify(msg)).collect()
}

/// Runs the pipeline over one session and packages the result.
///
/// `index` is the 1-based position of the session in the run. The outcome's
/// blocks start with a header carrying the session title.
pub fn process_session(index: usize, session: &SessionRecord, config: &PipelineConfig) -> SessionOutcome {
    let mut blocks = vec![Block::header(&session.title)];
    let mut omissions = Vec::new();
    let mut dropped = 0usize;

    for result in classify_messages(&session.messages, config) {
        match result {
            Classification::Dropped => dropped += 1,
            Classification::Block(block) => blocks.push(block),
            Classification::Omitted(omission) => omissions.push(omission),
        }
    }

    let outcome = SessionOutcome {
        index,
        title: session.title.clone(),
        date: session_date_label(&session.metadata),
        blocks,
        omissions,
    };

    info!(
        session = index,
        title = %outcome.title,
        blocks = outcome.blocks.len() - 1,
        omitted = outcome.omissions.len(),
        duplicates = outcome.count(OmissionReason::Duplicate),
        dropped,
        "session classified"
    );
    outcome
}
