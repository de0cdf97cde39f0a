//! JSON output writer.

use serde::Serialize;

use crate::config::{Cast, RenderConfig};
use crate::core::models::Block;
use crate::core::transcript::{Transcript, fallback_range};
use crate::error::Result;

use super::{OmissionRow, omission_rows};

#[derive(Serialize)]
struct CastEntry<'a> {
    speaker: &'a str,
    player: &'a str,
}

#[derive(Serialize)]
struct JsonSession<'a> {
    index: usize,
    title: &'a str,
    date: &'a str,
    blocks: &'a [Block],
}

/// The whole transcript as one JSON document.
#[derive(Serialize)]
struct JsonTranscript<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_range: Option<String>,
    date_range: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cast: Vec<CastEntry<'a>>,
    sessions: Vec<JsonSession<'a>>,
}

/// Converts the transcript to a pretty-printed JSON document.
///
/// # Format
/// ```json
/// {
///   "title": "Kingmaker",
///   "session_range": "Sessions 1 - 2",
///   "date_range": "March 2, 2025 - March 9, 2025",
///   "sessions": [
///     {"index": 1, "title": "...", "date": "...", "blocks": [{"kind": "header", ...}]}
///   ]
/// }
/// ```
pub fn to_json(transcript: &Transcript, render: &RenderConfig, cast: &Cast) -> Result<String> {
    let doc = JsonTranscript {
        title: &render.title,
        session_range: transcript.session_range_label(),
        date_range: transcript.date_range_label().unwrap_or_else(fallback_range),
        cast: cast
            .iter()
            .map(|(speaker, player)| CastEntry { speaker, player })
            .collect(),
        sessions: transcript
            .iter()
            .map(|outcome| JsonSession {
                index: outcome.index,
                title: &outcome.title,
                date: outcome.date_label(),
                blocks: &outcome.blocks,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Converts the omissions to a pretty-printed JSON array of rows.
pub fn omissions_to_json(transcript: &Transcript) -> Result<String> {
    let rows: Vec<OmissionRow<'_>> = omission_rows(transcript).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatMessage;
    use crate::config::PipelineConfig;
    use crate::core::models::SessionRecord;
    use crate::core::transcript::build_transcript;
    use serde_json::Value;

    fn transcript() -> Transcript {
        let sessions = [SessionRecord::new(
            "One",
            vec![
                ChatMessage::new("Ezren", "<p>Hello</p>"),
                ChatMessage::new("Ezren", "<p>secret</p>").with_whisper("gm"),
            ],
        )];
        build_transcript(&sessions, &PipelineConfig::default())
    }

    #[test]
    fn test_to_json_document() {
        let mut cast = Cast::new();
        cast.insert("Ezren", "pat");
        let json = to_json(&transcript(), &RenderConfig::new().with_title("Campaign"), &cast).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(doc["title"], "Campaign");
        assert_eq!(doc["session_range"], "Sessions 1 - 1");
        assert_eq!(doc["date_range"], "FALLBACK DATE! - FALLBACK DATE!");
        assert_eq!(doc["cast"][0]["player"], "pat");
        let blocks = doc["sessions"][0]["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["kind"], "header");
        assert_eq!(blocks[1]["speaker"], "Ezren");
        assert_eq!(blocks[1]["style"], 0);
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_to_json_skips_empty_parts() {
        let json = to_json(&Transcript::new(), &RenderConfig::new(), &Cast::new()).unwrap();
        assert!(!json.contains("cast"));
        assert!(!json.contains("session_range"));
    }

    #[test]
    fn test_omissions_to_json() {
        let json = omissions_to_json(&transcript()).unwrap();
        let rows: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["reason"], "WHISPER");
        assert_eq!(rows[0]["text"], "secret");
        assert_eq!(rows[0]["session"], 1);
    }
}
