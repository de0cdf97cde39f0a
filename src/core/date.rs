//! Session date resolution.
//!
//! Session exports carry their date in whichever field the exporting version
//! happened to write. [`resolve_session_date`] probes a fixed list of
//! candidates and returns the first one that parses:
//!
//! | Order | Field |
//! |-------|-------|
//! | 1-10 | `data.<key>` then `<key>`, for each key in `created`, `createdTime`, `modified`, `modifiedTime`, `timestamp` |
//! | 11 | `data._stats.createdTime` |
//! | 12 | `data._stats.modifiedTime` |
//!
//! An earlier field that exists but does not parse is skipped; an earlier
//! field that parses wins even if a later one looks more plausible.
//!
//! ```rust
//! use serde_json::json;
//! use sessionpack::core::date::session_date_label;
//!
//! let doc = json!({"data": {"_stats": {"createdTime": 1700000000000i64}}});
//! assert_eq!(session_date_label(&doc).as_deref(), Some("November 14, 2023"));
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Epoch values above this are milliseconds, the rest seconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const DATE_KEYS: [&str; 5] = ["created", "createdTime", "modified", "modifiedTime", "timestamp"];
const STATS_KEYS: [&str; 2] = ["createdTime", "modifiedTime"];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Collects candidate date values in probe order.
pub fn date_candidates(doc: &Value) -> Vec<&Value> {
    let Some(root) = doc.as_object() else {
        return Vec::new();
    };
    let data = root.get("data").and_then(Value::as_object);

    let mut candidates = Vec::new();
    for key in DATE_KEYS {
        if let Some(value) = data.and_then(|d| d.get(key)) {
            candidates.push(value);
        }
        if let Some(value) = root.get(key) {
            candidates.push(value);
        }
    }

    if let Some(stats) = data.and_then(|d| d.get("_stats")).and_then(Value::as_object) {
        candidates.extend(STATS_KEYS.iter().filter_map(|key| stats.get(*key)));
    }
    candidates
}

/// Returns the date of the first candidate that parses.
pub fn resolve_session_date(doc: &Value) -> Option<NaiveDate> {
    date_candidates(doc).into_iter().find_map(parse_timestamp)
}

/// Resolves and formats the session date as `"<Month> <day>, <year>"`.
pub fn session_date_label(doc: &Value) -> Option<String> {
    resolve_session_date(doc).map(format_date)
}

/// Formats a date the way transcripts show it, e.g. `"March 2, 2025"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Interprets one value as a point in time and returns its calendar date.
///
/// Integers, floats (truncated) and all-digit strings are epoch values;
/// anything above [`MILLIS_THRESHOLD`] counts as milliseconds. Other strings
/// are read as ISO-8601, with a trailing `Z` meaning UTC. Offset timestamps
/// keep their local calendar date.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let epoch = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            epoch_date(epoch)
        }
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                if let Some(date) = s.parse::<i64>().ok().and_then(epoch_date) {
                    return Some(date);
                }
            }
            parse_iso(s)
        }
        _ => None,
    }
}

fn epoch_date(epoch: i64) -> Option<NaiveDate> {
    let dt: DateTime<Utc> = if epoch > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)?
    } else {
        DateTime::from_timestamp(epoch, 0)?
    };
    Some(dt.date_naive())
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    let normalized = match s.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => s.to_string(),
    };
    let s = normalized.as_str();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
