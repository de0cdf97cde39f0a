//! Markdown transcript and omission report.
//!
//! Message text and speakers are escaped so chat content cannot open
//! headings, emphasis, links or inline HTML. The document title and the
//! cast list come from local config and are written as-is.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Cast, RenderConfig};
use crate::core::models::{Block, BlockKind, SessionOutcome};
use crate::core::transcript::{Transcript, fallback_range};

use super::omission_report_title;

static KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)critical success|critical failure|success|failure").unwrap());

/// Bolds outcome keywords and optionally italicises the rest.
///
/// Whitespace stays outside the emphasis markers so the Markdown renders.
///
/// ```rust
/// use sessionpack::core::output::emphasize;
///
/// assert_eq!(emphasize("A critical success!", false), "A **critical success**!");
/// assert_eq!(emphasize("The door creaks.", true), "*The door creaks.*");
/// ```
pub fn emphasize(text: &str, italic: bool) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for m in KEYWORDS.find_iter(text) {
        push_plain(&mut out, &text[last..m.start()], italic);
        let _ = write!(out, "**{}**", m.as_str());
        last = m.end();
    }
    push_plain(&mut out, &text[last..], italic);
    out
}

/// Backslash-escapes characters that Markdown would treat as markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_plain(out: &mut String, part: &str, italic: bool) {
    let core = part.trim();
    if !italic || core.is_empty() {
        out.push_str(part);
        return;
    }
    let start = part.len() - part.trim_start().len();
    let end = start + core.len();
    out.push_str(&part[..start]);
    let _ = write!(out, "*{core}*");
    out.push_str(&part[end..]);
}

fn write_block(out: &mut String, outcome: &SessionOutcome, block: &Block) {
    match block.kind {
        BlockKind::Header => {
            let _ = writeln!(out, "## {}\n", escape(&block.text));
            let _ = writeln!(out, "*{}*\n", outcome.date_label());
        }
        BlockKind::Subheader => {
            let _ = writeln!(out, "### {}\n", escape(&block.text));
        }
        BlockKind::Dialogue | BlockKind::Roll => {
            let italic = block.kind == BlockKind::Dialogue && block.style.is_narration();
            let speaker = escape(block.speaker.as_deref().unwrap_or_default());
            let _ = writeln!(out, "**{speaker}:** {}\n", emphasize(&escape(&block.text), italic));
        }
    }
}

/// Renders the full transcript.
///
/// The front matter holds the document title, the session and date ranges
/// and, when present, the cast list. Each session follows under its own
/// heading with its date.
pub fn to_markdown(transcript: &Transcript, render: &RenderConfig, cast: &Cast) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", render.title);

    if let Some(range) = transcript.session_range_label() {
        let _ = writeln!(out, "{range}  ");
    }
    let dates = transcript.date_range_label().unwrap_or_else(fallback_range);
    let _ = writeln!(out, "{dates}\n");

    if !cast.is_empty() {
        out.push_str("**Cast:**\n\n");
        for (speaker, player) in cast.iter() {
            let _ = writeln!(out, "- **{speaker}** — {player}");
        }
        out.push('\n');
    }

    for outcome in transcript {
        out.push_str("---\n\n");
        for block in &outcome.blocks {
            write_block(&mut out, outcome, block);
        }
    }
    out
}

/// Renders the omission report. Sessions without omissions are skipped.
pub fn omissions_to_markdown(transcript: &Transcript, render: &RenderConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", omission_report_title(&render.title));

    for outcome in transcript.iter().filter(|o| o.has_omissions()) {
        let _ = writeln!(out, "## Session {}: {}\n", outcome.index, escape(&outcome.title));
        let _ = writeln!(out, "*{}*\n", outcome.date_label());
        for omission in &outcome.omissions {
            let _ = writeln!(
                out,
                "- [{}] {}: {}",
                omission.reason,
                escape(&omission.speaker),
                escape(&omission.text)
            );
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatMessage;
    use crate::config::PipelineConfig;
    use crate::core::models::SessionRecord;
    use crate::core::transcript::build_transcript;
    use crate::message::MessageStyle;
    use serde_json::json;

    fn sample() -> Transcript {
        let sessions = [
            SessionRecord::new(
                "The Stolen Land",
                vec![
                    ChatMessage::new("GM", "<p>### Oleg's Trading Post</p>"),
                    ChatMessage::new("GM", "<p>Rain falls.</p>").with_style(MessageStyle::Narration),
                    ChatMessage::new("Amiri", "<p>Critical Failure on that one.</p>"),
                    ChatMessage::new("Amiri", "<p>Critical Failure on that one.</p>"),
                ],
            )
            .with_metadata(json!({"created": "2025-03-02"})),
            SessionRecord::new("Quiet Night", vec![ChatMessage::new("Kyra", "<p>Nothing.</p>")]),
        ];
        build_transcript(&sessions, &PipelineConfig::default())
    }

    #[test]
    fn test_emphasize_keeps_whitespace_outside() {
        assert_eq!(emphasize(" quiet ", true), " *quiet* ");
        assert_eq!(emphasize("Success", true), "**Success**");
        assert_eq!(emphasize("a Success b", true), "*a* **Success** *b*");
        assert_eq!(emphasize("", true), "");
    }

    #[test]
    fn test_front_matter() {
        let render = RenderConfig::default().with_title("Kingmaker");
        let mut cast = Cast::new();
        cast.insert("Amiri", "sam");
        let md = to_markdown(&sample(), &render, &cast);

        assert!(md.starts_with("# Kingmaker\n"));
        assert!(md.contains("Sessions 1 - 2"));
        assert!(md.contains("March 2, 2025 - FALLBACK DATE!"));
        assert!(md.contains("**Cast:**"));
        assert!(md.contains("- **Amiri** — sam"));
    }

    #[test]
    fn test_session_body() {
        let md = to_markdown(&sample(), &RenderConfig::default(), &Cast::new());
        assert!(md.contains("## The Stolen Land\n\n*March 2, 2025*"));
        assert!(md.contains("### Oleg's Trading Post"));
        assert!(md.contains("**GM:** *Rain falls.*"));
        assert!(md.contains("**Amiri:** **Critical Failure** on that one."));
        assert_eq!(md.matches("Critical Failure").count(), 1);
        assert!(!md.contains("Cast:"));
    }

    #[test]
    fn test_empty_transcript() {
        let md = to_markdown(&Transcript::new(), &RenderConfig::default(), &Cast::new());
        assert!(md.contains("FALLBACK DATE! - FALLBACK DATE!"));
        assert!(!md.contains("Sessions 1"));
    }

    #[test]
    fn test_omission_report() {
        let render = RenderConfig::default().with_title("Kingmaker");
        let md = omissions_to_markdown(&sample(), &render);
        assert!(md.starts_with("# Omitted Messages — Kingmaker"));
        assert!(md.contains("## Session 1: The Stolen Land"));
        assert!(md.contains("- [DUPLICATE] Amiri: Critical Failure on that one."));
        assert!(!md.contains("Quiet Night"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("# not a heading"), "\\# not a heading");
        assert_eq!(escape("**loud** _x_ [link](y) <b>"), "\\*\\*loud\\*\\* \\_x\\_ \\[link\\](y) \\<b>");
        assert_eq!(escape("plain, text."), "plain, text.");
    }

    #[test]
    fn test_chat_markup_is_escaped() {
        let sessions = [SessionRecord::new(
            "S",
            vec![
                ChatMessage::new("GM", "<p>### *Boss* Fight</p>"),
                ChatMessage::new("Kyra", "<p># **not bold**</p>"),
                ChatMessage::new("Kyra", "&lt;grin&gt; _nice_ success").with_style(MessageStyle::Narration),
            ],
        )];
        let md = to_markdown(&build_transcript(&sessions, &PipelineConfig::default()), &RenderConfig::default(), &Cast::new());
        assert!(md.contains("### \\*Boss\\* Fight\n"));
        assert!(md.contains("**Kyra:** \\# \\*\\*not bold\\*\\*\n"));
        assert!(md.contains("**Kyra:** *\\<grin> \\_nice\\_* **success**\n"));
    }

    #[test]
    fn test_omission_report_escapes_text() {
        let sessions = [SessionRecord::new(
            "S",
            vec![ChatMessage::new("Kyra", "<p>*psst*</p>").with_whisper("gm")],
        )];
        let md = omissions_to_markdown(&build_transcript(&sessions, &PipelineConfig::default()), &RenderConfig::default());
        assert!(md.contains("- [WHISPER] Kyra: \\*psst\\*"));
    }
}
