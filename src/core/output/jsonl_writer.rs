//! JSON Lines output writer.

use serde::Serialize;

use crate::core::transcript::Transcript;
use crate::error::Result;

use super::{block_rows, omission_rows};

fn lines<T: Serialize>(rows: impl Iterator<Item = T>) -> Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(&row)?);
        out.push('\n');
    }
    Ok(out)
}

/// One block per line, session headers included.
///
/// # Format
/// ```jsonl
/// {"session":1,"session_title":"One","date":"March 2, 2025","kind":"header","speaker":"","text":"One","style":0}
/// {"session":1,"session_title":"One","date":"March 2, 2025","kind":"dialogue","speaker":"Kyra","text":"Hi","style":0}
/// ```
pub fn to_jsonl(transcript: &Transcript) -> Result<String> {
    lines(block_rows(transcript))
}

/// One omission per line.
pub fn omissions_to_jsonl(transcript: &Transcript) -> Result<String> {
    lines(omission_rows(transcript))
}
