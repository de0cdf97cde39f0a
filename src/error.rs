//! Unified error types for sessionpack.
//!
//! This module provides a single [`SessionpackError`] enum that covers all
//! error cases in the library.
//!
//! Only two things can actually stop a run: a session file that is not valid
//! JSON, and I/O. Everything else the pipeline meets (missing speakers,
//! missing dates, half-rendered rolls, bad config values) has a fallback and
//! never surfaces here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for sessionpack operations.
///
/// # Example
///
/// ```rust
/// use sessionpack::error::Result;
/// use sessionpack::core::SessionOutcome;
///
/// fn my_function() -> Result<Vec<SessionOutcome>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, SessionpackError>;

/// The error type for all sessionpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input directory or a session file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse a session file.
    ///
    /// Contains the format being parsed, the underlying parse error,
    /// and optionally the file path.
    #[error("Failed to parse {format}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "session JSON")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A configuration value could not be used.
    ///
    /// The pipeline itself never raises this (bad values fall back to
    /// defaults); it is returned by strict helpers such as
    /// [`parse_flag`](crate::config::parse_flag).
    #[error("Invalid value for {key}: {message}")]
    InvalidConfig {
        /// The configuration key
        key: String,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error while writing output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl From<std::string::FromUtf8Error> for SessionpackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        SessionpackError::Utf8 {
            context: "rendered output".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl SessionpackError {
    /// Creates a parse error for a session JSON file.
    pub fn session_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        SessionpackError::Parse {
            format: "session JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        SessionpackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        SessionpackError::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, SessionpackError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, SessionpackError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, SessionpackError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, SessionpackError::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = SessionpackError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_parse_error_with_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = SessionpackError::session_parse(json_err, Some(PathBuf::from("sessions/3.json")));
        let display = err.to_string();
        assert!(display.contains("session JSON"));
        assert!(display.contains("sessions/3.json"));
        assert!(err.is_parse());
    }

    #[test]
    fn test_parse_error_without_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err = SessionpackError::session_parse(json_err, None);
        let display = err.to_string();
        assert!(display.starts_with("Failed to parse session JSON: "));
        assert!(!display.contains("file:"));
    }

    #[test]
    fn test_utf8_error_via_question_mark() {
        fn decode(bytes: Vec<u8>) -> Result<String> {
            Ok(String::from_utf8(bytes)?)
        }

        let err = decode(vec![b'o', b'k', 0xff]).unwrap_err();
        assert!(matches!(err, SessionpackError::Utf8 { .. }));
        assert!(err.to_string().starts_with("UTF-8 encoding error in rendered output"));
        assert_eq!(decode(b"ok".to_vec()).unwrap(), "ok");
    }

    #[test]
    fn test_invalid_format_display() {
        let err = SessionpackError::invalid_format("output", "unknown extension");
        assert_eq!(err.to_string(), "Invalid output format: unknown extension");
        assert!(err.is_invalid_format());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_invalid_config_display() {
        let err = SessionpackError::invalid_config("OMIT_WHISPERS", "expected yes or no");
        assert!(err.to_string().contains("OMIT_WHISPERS"));
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = SessionpackError::session_parse(json_err, None);
        assert!(err.source().is_some());
    }
}
