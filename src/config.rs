//! Configuration types for the pipeline and the renderers.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`PipelineConfig`] - which messages are omitted and how speakers default
//! - [`RenderConfig`] - document-level settings used by the writers
//! - [`Cast`] - speaker to player mapping for the transcript front matter
//!
//! All three can be built in code with `with_*` methods or read from the flat
//! `KEY = VALUE` files the tool has always used:
//!
//! ```text
//! # config.txt
//! TITLE = Curse of the Crimson Throne
//! OMIT_PUBLIC_ROLLS = yes
//! DEFAULT_SPEAKER = Narrator
//! ```
//!
//! # Example
//!
//! ```rust
//! use sessionpack::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_kv_str("OMIT_WHISPERS = no\nDEFAULT_SPEAKER = GM");
//! assert!(!config.omit_whispers);
//! assert_eq!(config.default_speaker, "GM");
//!
//! let strict = PipelineConfig::new()
//!     .with_omit_public_rolls(true)
//!     .with_subhead_bookmarks(false);
//! assert!(strict.omit_public_rolls);
//! ```

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SessionpackError};

/// Speaker name used when a message has no alias.
pub const DEFAULT_SPEAKER: &str = "Handler";

/// Document title used when none is configured.
pub const DEFAULT_TITLE: &str = "FoundryVTT Session Transcript";

/// Away-from-keyboard phrases: a message consisting only of one of these
/// (plus trailing punctuation) is treated as AFK chatter.
pub const DEFAULT_AFK_PATTERN: &str = r"(?i)^(?:afk|brb|bbl|bbiab|bbs|be right back|back|g2g|gtg|got to go|away)[\s.!]*$";

/// Recognized configuration keys.
pub mod keys {
    pub const OMIT_AFK_MESSAGES: &str = "OMIT_AFK_MESSAGES";
    pub const AFK_PATTERN: &str = "AFK_PATTERN";
    pub const SUBHEAD_BOOKMARKS: &str = "SUBHEAD_BOOKMARKS";
    pub const OMIT_WHISPERS: &str = "OMIT_WHISPERS";
    pub const OMIT_PRIVATE_GM_ROLLS: &str = "OMIT_PRIVATE_GM_ROLLS";
    pub const OMIT_BLIND_GM_ROLLS: &str = "OMIT_BLIND_GM_ROLLS";
    pub const OMIT_SELF_ROLLS: &str = "OMIT_SELF_ROLLS";
    pub const OMIT_PUBLIC_ROLLS: &str = "OMIT_PUBLIC_ROLLS";
    pub const DEFAULT_SPEAKER: &str = "DEFAULT_SPEAKER";
    pub const TITLE: &str = "TITLE";
}

/// Configuration for message classification.
///
/// Every omission rule has its own toggle. The value is immutable once
/// handed to a [`Classifier`](crate::core::Classifier).
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `omit_afk` | `true` |
/// | `afk_pattern` | [`DEFAULT_AFK_PATTERN`] |
/// | `subhead_bookmarks` | `true` |
/// | `omit_whispers` | `true` |
/// | `omit_private_gm_rolls` | `true` |
/// | `omit_blind_gm_rolls` | `true` |
/// | `omit_self_rolls` | `true` |
/// | `omit_public_rolls` | `false` |
/// | `default_speaker` | [`DEFAULT_SPEAKER`] |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Divert away-from-keyboard chatter to the omission report.
    pub omit_afk: bool,

    /// Regex matched against normalized message text.
    pub afk_pattern: String,

    /// Turn `### Title` messages into sub-section headers.
    pub subhead_bookmarks: bool,

    pub omit_whispers: bool,
    pub omit_private_gm_rolls: bool,

    /// Covers both the `blind` flag and blind roll modes.
    pub omit_blind_gm_rolls: bool,

    pub omit_self_rolls: bool,
    pub omit_public_rolls: bool,

    /// Display name for messages without a speaker alias.
    pub default_speaker: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            omit_afk: true,
            afk_pattern: DEFAULT_AFK_PATTERN.to_string(),
            subhead_bookmarks: true,
            omit_whispers: true,
            omit_private_gm_rolls: true,
            omit_blind_gm_rolls: true,
            omit_self_rolls: true,
            omit_public_rolls: false,
            default_speaker: DEFAULT_SPEAKER.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that keeps every message (no omission rule
    /// fires, duplicates are still suppressed).
    pub fn keep_all() -> Self {
        Self {
            omit_afk: false,
            omit_whispers: false,
            omit_private_gm_rolls: false,
            omit_blind_gm_rolls: false,
            omit_self_rolls: false,
            omit_public_rolls: false,
            ..Self::default()
        }
    }

    /// Builds a configuration from key/value pairs.
    ///
    /// Keys are matched case-insensitively, unknown keys are ignored, and
    /// values that cannot be understood leave the default in place.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref().trim().to_ascii_uppercase();
            let value = value.as_ref().trim();
            match key.as_str() {
                keys::OMIT_AFK_MESSAGES => config.omit_afk = flag_or(&key, value, config.omit_afk),
                keys::AFK_PATTERN => {
                    if Regex::new(value).is_ok() {
                        config.afk_pattern = value.to_string();
                    } else {
                        warn!(key = %key, value, "invalid AFK pattern, keeping default");
                    }
                }
                keys::SUBHEAD_BOOKMARKS => {
                    config.subhead_bookmarks = flag_or(&key, value, config.subhead_bookmarks);
                }
                keys::OMIT_WHISPERS => {
                    config.omit_whispers = flag_or(&key, value, config.omit_whispers);
                }
                keys::OMIT_PRIVATE_GM_ROLLS => {
                    config.omit_private_gm_rolls =
                        flag_or(&key, value, config.omit_private_gm_rolls);
                }
                keys::OMIT_BLIND_GM_ROLLS => {
                    config.omit_blind_gm_rolls = flag_or(&key, value, config.omit_blind_gm_rolls);
                }
                keys::OMIT_SELF_ROLLS => {
                    config.omit_self_rolls = flag_or(&key, value, config.omit_self_rolls);
                }
                keys::OMIT_PUBLIC_ROLLS => {
                    config.omit_public_rolls = flag_or(&key, value, config.omit_public_rolls);
                }
                keys::DEFAULT_SPEAKER if !value.is_empty() => {
                    config.default_speaker = value.to_string();
                }
                _ => {}
            }
        }
        config
    }

    /// Parses `KEY = VALUE` text. See [`parse_kv_lines`].
    pub fn from_kv_str(text: &str) -> Self {
        Self::from_pairs(parse_kv_lines(text))
    }

    /// Compiles the AFK pattern, falling back to [`DEFAULT_AFK_PATTERN`].
    pub fn afk_regex(&self) -> Regex {
        Regex::new(&self.afk_pattern).unwrap_or_else(|err| {
            warn!(pattern = %self.afk_pattern, %err, "invalid AFK pattern, using default");
            default_afk_regex()
        })
    }

    #[must_use]
    pub fn with_omit_afk(mut self, enabled: bool) -> Self {
        self.omit_afk = enabled;
        self
    }

    #[must_use]
    pub fn with_afk_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.afk_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn with_subhead_bookmarks(mut self, enabled: bool) -> Self {
        self.subhead_bookmarks = enabled;
        self
    }

    #[must_use]
    pub fn with_omit_whispers(mut self, enabled: bool) -> Self {
        self.omit_whispers = enabled;
        self
    }

    #[must_use]
    pub fn with_omit_private_gm_rolls(mut self, enabled: bool) -> Self {
        self.omit_private_gm_rolls = enabled;
        self
    }

    #[must_use]
    pub fn with_omit_blind_gm_rolls(mut self, enabled: bool) -> Self {
        self.omit_blind_gm_rolls = enabled;
        self
    }

    #[must_use]
    pub fn with_omit_self_rolls(mut self, enabled: bool) -> Self {
        self.omit_self_rolls = enabled;
        self
    }

    #[must_use]
    pub fn with_omit_public_rolls(mut self, enabled: bool) -> Self {
        self.omit_public_rolls = enabled;
        self
    }

    #[must_use]
    pub fn with_default_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.default_speaker = speaker.into();
        self
    }
}

fn default_afk_regex() -> Regex {
    Regex::new(DEFAULT_AFK_PATTERN).expect("default AFK pattern compiles")
}

/// Document-level settings for the writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Transcript title (default: [`DEFAULT_TITLE`]).
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a render configuration from key/value pairs (only `TITLE` is read).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if key.as_ref().trim().eq_ignore_ascii_case(keys::TITLE) && !value.is_empty() {
                config.title = value.to_string();
            }
        }
        config
    }

    pub fn from_kv_str(text: &str) -> Self {
        Self::from_pairs(parse_kv_lines(text))
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Title with everything but word characters, spaces and dashes removed,
    /// and spaces replaced by underscores. Used to name output files.
    ///
    /// ```rust
    /// use sessionpack::config::RenderConfig;
    ///
    /// let config = RenderConfig::new().with_title("Night's Watch: Part 2");
    /// assert_eq!(config.file_stem(), "Nights_Watch_Part_2");
    /// ```
    pub fn file_stem(&self) -> String {
        let kept: String = self
            .title
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
            .collect();
        kept.trim().replace(' ', "_")
    }
}

/// The cast list: speaker names and the players behind them, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cast {
    entries: Vec<(String, String)>,
}

impl Cast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `Speaker = player` lines. A repeated speaker keeps its first
    /// position and takes the last player name.
    pub fn from_kv_str(text: &str) -> Self {
        let mut cast = Self::new();
        for (speaker, player) in parse_kv_lines(text) {
            cast.insert(speaker, player);
        }
        cast
    }

    pub fn insert(&mut self, speaker: impl Into<String>, player: impl Into<String>) {
        let speaker = speaker.into();
        let player = player.into();
        match self.entries.iter_mut().find(|(s, _)| *s == speaker) {
            Some(entry) => entry.1 = player,
            None => self.entries.push((speaker, player)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits `KEY = VALUE` text into trimmed pairs.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Only the
/// first `=` separates key from value.
///
/// ```rust
/// use sessionpack::config::parse_kv_lines;
///
/// let pairs = parse_kv_lines("# comment\nA = 1\n\nB=x=y\nnoise");
/// assert_eq!(pairs, vec![
///     ("A".to_string(), "1".to_string()),
///     ("B".to_string(), "x=y".to_string()),
/// ]);
/// ```
pub fn parse_kv_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Reads a `KEY = VALUE` file. Returns `Ok(None)` when the file does not exist.
pub fn read_kv_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Parses a yes/no style flag.
///
/// Accepts `yes`/`no`, `true`/`false`, `on`/`off`, `y`/`n` and `1`/`0`,
/// case-insensitively.
///
/// ```rust
/// use sessionpack::config::parse_flag;
///
/// assert!(parse_flag("K", "YES").unwrap());
/// assert!(!parse_flag("K", "off").unwrap());
/// assert!(parse_flag("K", "maybe").is_err());
/// ```
pub fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "1" => Ok(true),
        "no" | "n" | "false" | "off" | "0" => Ok(false),
        other => Err(SessionpackError::invalid_config(
            key,
            format!("expected yes or no, got '{other}'"),
        )),
    }
}

fn flag_or(key: &str, value: &str, default: bool) -> bool {
    parse_flag(key, value).unwrap_or_else(|err| {
        warn!(%err, "keeping default {}", if default { "yes" } else { "no" });
        default
    })
}
