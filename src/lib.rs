//! # Sessionpack
//!
//! A Rust library for turning FoundryVTT chat-log exports into a readable
//! session transcript plus an audit trail of everything that was left out.
//!
//! ## Overview
//!
//! Each session's messages run through an ordered set of rules:
//! - **Empty** messages (nothing left after stripping markup) are dropped
//! - **AFK** chatter ("brb", "afk", ...) is omitted
//! - **`### Title`** lines become subheaders
//! - **Hidden** messages (whispers, blind, GM-only, self and optionally
//!   public rolls) are omitted
//! - **Consecutive duplicates** from the same speaker are omitted
//! - **Roll cards** become one-line summaries, everything else dialogue
//!
//! Every omission keeps its reason, speaker and text so the report can show
//! exactly what was removed and why.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sessionpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let sessions = load_sessions(Path::new("sessions"))?;
//!     let transcript = build_transcript(&sessions, &PipelineConfig::default());
//!
//!     let render = RenderConfig::default();
//!     write_transcript(&transcript, Path::new("export/transcript.md"), OutputFormat::Markdown, &render, &Cast::new())?;
//!     write_omissions(&transcript, Path::new("export/omitted/report.md"), OutputFormat::Markdown, &render)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## In-memory sessions
//!
//! ```rust
//! use sessionpack::prelude::*;
//!
//! let session = SessionRecord::new("Session 1", vec![
//!     ChatMessage::new("Alice", "<p>Hello</p>"),
//!     ChatMessage::new("Alice", "<p>Hello</p>"),
//!     ChatMessage::new("Bob", "<p>psst</p>").with_whisper("gm"),
//! ]);
//!
//! let outcome = process_session(1, &session, &PipelineConfig::default());
//! assert_eq!(outcome.blocks.len(), 2); // header + "Alice: Hello"
//! assert_eq!(outcome.count(OmissionReason::Duplicate), 1);
//! assert_eq!(outcome.count(OmissionReason::Whisper), 1);
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] — [`ChatMessage`] as found in session exports
//! - [`parser`] — Session file loading and discovery
//! - [`config`] — [`PipelineConfig`](config::PipelineConfig), [`RenderConfig`](config::RenderConfig), [`Cast`](config::Cast)
//! - [`core`] — Classification pipeline, transcript and writers
//! - [`format`] — [`OutputFormat`](format::OutputFormat) and file writing
//! - [`cli`] — CLI arguments (`cli` feature)
//! - [`error`] — Unified error types ([`SessionpackError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parser;

// Re-export the main types at the crate root for convenience
pub use error::{Result, SessionpackError};
pub use message::ChatMessage;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use sessionpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ChatMessage;
    pub use crate::message::MessageStyle;

    pub use crate::error::{Result, SessionpackError};

    pub use crate::config::{Cast, PipelineConfig, RenderConfig};

    pub use crate::parser::{SessionParser, discover_sessions, load_sessions};

    pub use crate::core::models::{
        Block, BlockKind, Classification, Omission, OmissionReason, SessionOutcome, SessionRecord,
    };
    pub use crate::core::pipeline::{Classifier, classify_messages, process_session};
    pub use crate::core::transcript::{Transcript, TranscriptStats, build_transcript};

    pub use crate::format::{OutputFormat, write_omissions, write_transcript};
}
