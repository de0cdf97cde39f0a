//! Transcript and omission-report writers.
//!
//! | Format | Transcript | Omission report |
//! |--------|------------|-----------------|
//! | Markdown | front matter, then one section per session | grouped by session |
//! | JSON | one document with front matter and sessions | array of rows |
//! | JSONL | one block row per line | one omission row per line |
//! | CSV | block rows, `;` delimited (`csv-output`) | omission rows |
//!
//! Every writer has a `to_*` function returning a `String`; writing to disk
//! goes through [`crate::format::write_transcript`] and
//! [`crate::format::write_omissions`].
//!
//! # Example
//!
//! ```rust
//! use sessionpack::ChatMessage;
//! use sessionpack::config::{Cast, PipelineConfig, RenderConfig};
//! use sessionpack::core::models::SessionRecord;
//! use sessionpack::core::output::to_markdown;
//! use sessionpack::core::transcript::build_transcript;
//!
//! let sessions = [SessionRecord::new("Arrival", vec![ChatMessage::new("Kyra", "<p>We made it.</p>")])];
//! let transcript = build_transcript(&sessions, &PipelineConfig::default());
//!
//! let md = to_markdown(&transcript, &RenderConfig::default(), &Cast::default());
//! assert!(md.contains("## Arrival"));
//! assert!(md.contains("**Kyra:** We made it."));
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;
mod jsonl_writer;
mod markdown;

#[cfg(feature = "csv-output")]
pub use csv_writer::{omissions_to_csv, to_csv};
pub use json_writer::{omissions_to_json, to_json};
pub use jsonl_writer::{omissions_to_jsonl, to_jsonl};
pub use markdown::{emphasize, omissions_to_markdown, to_markdown};

use serde::Serialize;

use super::models::{Block, BlockKind, Omission, OmissionReason, SessionOutcome};
use super::transcript::Transcript;

/// One accepted block, flattened with its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRow<'a> {
    pub session: usize,
    pub session_title: &'a str,
    pub date: &'a str,
    pub kind: BlockKind,
    pub speaker: &'a str,
    pub text: &'a str,
    pub style: u8,
}

impl<'a> BlockRow<'a> {
    pub fn new(outcome: &'a SessionOutcome, block: &'a Block) -> Self {
        Self {
            session: outcome.index,
            session_title: &outcome.title,
            date: outcome.date_label(),
            kind: block.kind,
            speaker: block.speaker.as_deref().unwrap_or_default(),
            text: &block.text,
            style: block.style.code(),
        }
    }
}

/// One omission, flattened with its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmissionRow<'a> {
    pub session: usize,
    pub session_title: &'a str,
    pub date: &'a str,
    pub reason: OmissionReason,
    pub speaker: &'a str,
    pub text: &'a str,
}

impl<'a> OmissionRow<'a> {
    pub fn new(outcome: &'a SessionOutcome, omission: &'a Omission) -> Self {
        Self {
            session: outcome.index,
            session_title: &outcome.title,
            date: outcome.date_label(),
            reason: omission.reason,
            speaker: &omission.speaker,
            text: &omission.text,
        }
    }
}

/// All block rows in transcript order.
pub fn block_rows(transcript: &Transcript) -> impl Iterator<Item = BlockRow<'_>> {
    transcript
        .iter()
        .flat_map(|outcome| outcome.blocks.iter().map(move |block| BlockRow::new(outcome, block)))
}

/// All omission rows in transcript order.
pub fn omission_rows(transcript: &Transcript) -> impl Iterator<Item = OmissionRow<'_>> {
    transcript.iter().flat_map(|outcome| {
        outcome
            .omissions
            .iter()
            .map(move |omission| OmissionRow::new(outcome, omission))
    })
}

/// Heading of the omission report, e.g. `"Omitted Messages — Kingmaker"`.
///
/// Underscores in the title are shown as spaces.
pub fn omission_report_title(title: &str) -> String {
    format!("Omitted Messages — {}", title.replace('_', " "))
}
