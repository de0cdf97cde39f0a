//! CSV output writer.

use serde::Serialize;

use crate::core::transcript::Transcript;
use crate::error::{Result, SessionpackError};

use super::{block_rows, omission_rows};

fn to_delimited<T: Serialize>(rows: impl Iterator<Item = T>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| SessionpackError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes blocks as CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `session`, `session_title`, `date`, `kind`, `speaker`, `text`, `style`
/// - Encoding: UTF-8
pub fn to_csv(transcript: &Transcript) -> Result<String> {
    to_delimited(block_rows(transcript))
}

/// Writes omissions as CSV.
///
/// Columns: `session`, `session_title`, `date`, `reason`, `speaker`, `text`.
pub fn omissions_to_csv(transcript: &Transcript) -> Result<String> {
    to_delimited(omission_rows(transcript))
}
