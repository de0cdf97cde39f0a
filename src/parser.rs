//! Session file loading.
//!
//! A session file is a JSON object with a `messages` array and, optionally,
//! a title and date fields at the top level or under `data`:
//!
//! ```json
//! {
//!   "data": { "title": "Session 3", "created": 1700000000000 },
//!   "messages": [
//!     { "content": "<p>Hello</p>", "speaker": { "alias": "Kyra" }, "style": 2 }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use sessionpack::parser::SessionParser;
//!
//! let parser = SessionParser::new();
//! let session = parser.parse_str(
//!     r#"{"title": "Session 3", "messages": [{"content": "<p>Hi</p>"}]}"#,
//!     "session3.json",
//! )?;
//! assert_eq!(session.title, "Session 3");
//! assert_eq!(session.messages.len(), 1);
//! # Ok::<(), sessionpack::SessionpackError>(())
//! ```
//!
//! Files in an input directory are processed in the order of the first
//! number in their names, see [`discover_sessions`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::ChatMessage;
use crate::core::models::SessionRecord;
use crate::error::{Result, SessionpackError};

/// Extension of session files.
pub const SESSION_EXTENSION: &str = "json";

/// Parser for session JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionParser;

impl SessionParser {
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses one session file.
    ///
    /// The file name is the title of last resort.
    ///
    /// # Errors
    ///
    /// Returns [`SessionpackError::Io`] if the file cannot be read and
    /// [`SessionpackError::Parse`] (carrying the path) if it is not valid
    /// session JSON.
    pub fn parse(&self, path: &Path) -> Result<SessionRecord> {
        let content = fs::read_to_string(path)?;
        let fallback = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut record = self.parse_document(&content, &fallback).map_err(|err| match err {
            SessionpackError::Parse { format, source, .. } => SessionpackError::Parse {
                format,
                source,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })?;
        record.source = Some(path.to_path_buf());
        Ok(record)
    }

    /// Parses session JSON from a string.
    pub fn parse_str(&self, content: &str, fallback_title: &str) -> Result<SessionRecord> {
        self.parse_document(content, fallback_title)
    }

    fn parse_document(&self, content: &str, fallback_title: &str) -> Result<SessionRecord> {
        let doc: Value =
            serde_json::from_str(content).map_err(|err| SessionpackError::session_parse(err, None))?;
        if !doc.is_object() {
            return Err(SessionpackError::invalid_format(
                "session",
                "top-level value must be an object",
            ));
        }

        let messages = match doc.get("messages") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    ChatMessage::deserialize(item).map_err(|err| SessionpackError::session_parse(err, None))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(SessionpackError::invalid_format(
                    "session",
                    "'messages' must be an array",
                ));
            }
        };

        let title = session_title(&doc).unwrap_or(fallback_title).to_string();
        Ok(SessionRecord::new(title, messages).with_metadata(doc))
    }
}

/// `data.title`, then `title`. Empty titles count as missing.
fn session_title(doc: &Value) -> Option<&str> {
    let nested = doc.get("data").and_then(|data| data.get("title"));
    [nested, doc.get("title")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|title| !title.is_empty())
}

/// Sort key for session files: the first run of digits in the file name
/// (0 if there is none), then the name itself.
///
/// ```rust
/// use sessionpack::parser::session_sort_key;
///
/// assert!(session_sort_key("session2.json") < session_sort_key("session10.json"));
/// assert_eq!(session_sort_key("prologue.json").0, 0);
/// ```
pub fn session_sort_key(file_name: &str) -> (u64, String) {
    let digits: String = file_name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    let number = if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(u64::MAX)
    };
    (number, file_name.to_string())
}

/// Lists the session files in `dir`, in processing order.
pub fn discover_sessions(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_session = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SESSION_EXTENSION));
        if is_session && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        session_sort_key(&name.unwrap_or_default())
    });
    Ok(files)
}

/// Discovers and parses every session in `dir`.
///
/// Stops at the first file that fails to parse.
pub fn load_sessions(dir: &Path) -> Result<Vec<SessionRecord>> {
    let parser = SessionParser::new();
    discover_sessions(dir)?
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "loading session");
            parser.parse(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_title_resolution() {
        let parser = SessionParser::new();
        let nested = parser
            .parse_str(r#"{"data": {"title": "Inner"}, "title": "Outer"}"#, "f.json")
            .unwrap();
        assert_eq!(nested.title, "Inner");

        let top = parser
            .parse_str(r#"{"data": {"title": ""}, "title": "Outer"}"#, "f.json")
            .unwrap();
        assert_eq!(top.title, "Outer");

        let fallback = parser.parse_str(r#"{"data": 5}"#, "f.json").unwrap();
        assert_eq!(fallback.title, "f.json");
        assert!(fallback.messages.is_empty());
    }

    #[test]
    fn test_metadata_kept() {
        let session = SessionParser::new()
            .parse_str(r#"{"created": "2025-03-02", "messages": []}"#, "s")
            .unwrap();
        assert_eq!(session.metadata["created"], "2025-03-02");
    }

    #[test]
    fn test_message_fields() {
        let session = SessionParser::new()
            .parse_str(
                r#"{"messages": [
                    {"content": "<p>Hi</p>", "speaker": {"alias": "Kyra"}, "style": 1,
                     "whisper": ["gm"], "blind": true, "rollMode": "gmroll", "flavor": "Attack"},
                    {"content": null, "speaker": null}
                ]}"#,
                "s",
            )
            .unwrap();
        let first = &session.messages[0];
        assert_eq!(first.alias(), Some("Kyra"));
        assert!(first.is_whisper());
        assert!(first.blind);
        assert_eq!(first.roll_mode(), Some("gmroll"));
        assert_eq!(first.flavor, "Attack");
        assert_eq!(session.messages[1].content(), None);
    }

    #[test]
    fn test_malformed_json() {
        let err = SessionParser::new().parse_str("{not json", "s").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_wrong_shapes() {
        let parser = SessionParser::new();
        assert!(parser.parse_str("[]", "s").unwrap_err().is_invalid_format());
        assert!(parser.parse_str(r#"{"messages": {}}"#, "s").unwrap_err().is_invalid_format());
        assert!(parser.parse_str(r#"{"messages": [5]}"#, "s").unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_file_error_has_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();

        let err = SessionParser::new().parse(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_parse_file_uses_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session7.json");
        fs::write(&path, r#"{"messages": []}"#).unwrap();

        let session = SessionParser::new().parse(&path).unwrap();
        assert_eq!(session.title, "session7.json");
        assert_eq!(session.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_discovery_order() {
        let dir = tempdir().unwrap();
        for name in ["s10.json", "s2.json", "notes.txt", "intro.JSON", "s2b.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let names: Vec<_> = discover_sessions(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["intro.JSON", "s2.json", "s2b.json", "s10.json"]);
    }

    #[test]
    fn test_discovery_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(discover_sessions(&dir.path().join("nope")).unwrap_err().is_io());
    }

    #[test]
    fn test_load_sessions_stops_on_bad_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1.json"), r#"{"messages": []}"#).unwrap();
        fs::write(dir.path().join("2.json"), "nope").unwrap();
        assert!(load_sessions(dir.path()).unwrap_err().is_parse());
    }
}
