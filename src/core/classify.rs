//! Per-message predicates: AFK chatter, subheaders and visibility.
//!
//! Each function looks at one message (or its normalized text) in isolation.
//! Ordering between them is the pipeline's job, see
//! [`Classifier`](super::pipeline::Classifier).

use regex::Regex;

use crate::ChatMessage;
use crate::config::PipelineConfig;

use super::models::OmissionReason;

/// Marker that opens a subheader line.
pub const SUBHEADER_MARKER: &str = "###";

/// Roll visibility modes, as recognized from the free-form `rollMode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollMode {
    /// Visible to the GM only.
    GmPrivate,
    /// Hidden from everyone but the GM, including the roller.
    Blind,
    /// Visible to the roller only.
    SelfRoll,
    Public,
}

impl RollMode {
    /// Matches a `rollMode` value against the known synonyms, trimmed and
    /// case-insensitively.
    ///
    /// ```rust
    /// use sessionpack::core::classify::RollMode;
    ///
    /// assert_eq!(RollMode::parse("GMROLL"), Some(RollMode::GmPrivate));
    /// assert_eq!(RollMode::parse(" blindroll "), Some(RollMode::Blind));
    /// assert_eq!(RollMode::parse("roll"), Some(RollMode::Public));
    /// assert_eq!(RollMode::parse("loud"), None);
    /// ```
    pub fn parse(mode: &str) -> Option<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "gmroll" | "gm" | "private" | "privateroll" => Some(RollMode::GmPrivate),
            "blindroll" | "blind" => Some(RollMode::Blind),
            "selfroll" | "self" => Some(RollMode::SelfRoll),
            "publicroll" | "public" | "roll" => Some(RollMode::Public),
            _ => None,
        }
    }
}

/// Returns `true` if `text` is AFK chatter according to `pattern`.
pub fn is_afk(text: &str, pattern: &Regex) -> bool {
    pattern.is_match(text)
}

/// Extracts the title of a `### Title` line.
///
/// Exactly three markers, then whitespace, then a non-empty title.
///
/// ```rust
/// use sessionpack::core::classify::subheader_title;
///
/// assert_eq!(subheader_title("### The Sunken Vault"), Some("The Sunken Vault"));
/// assert_eq!(subheader_title("#### Too deep"), None);
/// assert_eq!(subheader_title("###   "), None);
/// assert_eq!(subheader_title("###NoSpace"), None);
/// ```
pub fn subheader_title(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(SUBHEADER_MARKER)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some(title)
}

/// Decides whether a message is hidden from the table.
///
/// Checks run in a fixed order and only when their toggle is on: whisper
/// recipients, the blind flag, then the roll mode (GM-private, blind, self,
/// public). The first enabled match wins.
pub fn visibility_omission(msg: &ChatMessage, config: &PipelineConfig) -> Option<OmissionReason> {
    if config.omit_whispers && msg.is_whisper() {
        return Some(OmissionReason::Whisper);
    }
    if config.omit_blind_gm_rolls && msg.blind {
        return Some(OmissionReason::Blind);
    }

    match msg.roll_mode().and_then(RollMode::parse)? {
        RollMode::GmPrivate if config.omit_private_gm_rolls => Some(OmissionReason::PrivateGmRoll),
        RollMode::Blind if config.omit_blind_gm_rolls => Some(OmissionReason::Blind),
        RollMode::SelfRoll if config.omit_self_rolls => Some(OmissionReason::SelfRoll),
        RollMode::Public if config.omit_public_rolls => Some(OmissionReason::PublicRoll),
        _ => None,
    }
}
