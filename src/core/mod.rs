//! Core processing logic for sessionpack.
//!
//! This module contains:
//! - [`models`] - Sessions, blocks, omissions and per-session outcomes
//! - [`normalize`] - HTML to plain text
//! - [`roll`] - Dice roll summaries
//! - [`classify`] - AFK, subheader and visibility predicates
//! - [`date`] - Session date resolution
//! - [`pipeline`] - The per-session classification driver
//! - [`transcript`] - The run-wide collection of outcomes
//! - [`output`] - Format writers (Markdown, JSON, JSONL, CSV)
//!
//! # Quick Start
//!
//! ```rust
//! use sessionpack::ChatMessage;
//! use sessionpack::core::{PipelineConfig, SessionRecord, build_transcript};
//!
//! let session = SessionRecord::new("Session 1", vec![
//!     ChatMessage::new("Valeros", "<p>Onward!</p>"),
//!     ChatMessage::new("Valeros", "<p>brb</p>"),
//! ]);
//!
//! let transcript = build_transcript(&[session], &PipelineConfig::default());
//! let stats = transcript.stats();
//! assert_eq!(stats.blocks, 1);
//! assert_eq!(stats.total_omitted(), 1);
//! ```

pub mod classify;
pub mod date;
pub mod models;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod roll;
pub mod transcript;

pub use models::{
    Block, BlockKind, Classification, Omission, OmissionReason, SessionOutcome, SessionRecord,
};
pub use pipeline::{Classifier, classify_messages, process_session};
pub use transcript::{Transcript, TranscriptStats, build_transcript};

pub use crate::config::PipelineConfig;
