//! Output format types for the sessionpack library.
//!
//! These types don't depend on CLI frameworks and can be used directly from
//! library code.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> sessionpack::Result<()> {
//! use std::path::Path;
//! use sessionpack::config::{Cast, PipelineConfig, RenderConfig};
//! use sessionpack::core::build_transcript;
//! use sessionpack::format::{OutputFormat, write_omissions, write_transcript};
//! use sessionpack::parser::load_sessions;
//!
//! let sessions = load_sessions(Path::new("sessions"))?;
//! let transcript = build_transcript(&sessions, &PipelineConfig::default());
//! let render = RenderConfig::default();
//!
//! write_transcript(&transcript, Path::new("export/run.md"), OutputFormat::Markdown, &render, &Cast::new())?;
//! write_omissions(&transcript, Path::new("export/omitted/report.md"), OutputFormat::Markdown, &render)?;
//!
//! // Or detect the format from the extension
//! assert_eq!(OutputFormat::from_path("run.jsonl")?, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{Cast, RenderConfig};
use crate::core::output;
use crate::core::transcript::Transcript;
use crate::error::{Result, SessionpackError};

/// Output format for transcripts and omission reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Readable document with headings and emphasis.
    #[default]
    Markdown,

    /// One JSON document.
    Json,

    /// One JSON object per line.
    Jsonl,

    /// Semicolon-delimited rows. Requires the `csv-output` feature.
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all format names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["markdown", "md", "json", "jsonl", "ndjson", "csv"]
    }

    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Markdown,
            OutputFormat::Json,
            OutputFormat::Jsonl,
            OutputFormat::Csv,
        ]
    }

    /// Detects the format from a file extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = Path::new(path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(SessionpackError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: md, json, jsonl, csv"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "Markdown"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

#[cfg(not(feature = "csv-output"))]
fn csv_disabled() -> SessionpackError {
    SessionpackError::invalid_format(
        "output",
        "Output format CSV requires the 'csv-output' feature to be enabled",
    )
}

/// Renders the transcript in the given format.
pub fn render_transcript(
    transcript: &Transcript,
    format: OutputFormat,
    render: &RenderConfig,
    cast: &Cast,
) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(output::to_markdown(transcript, render, cast)),
        OutputFormat::Json => output::to_json(transcript, render, cast),
        OutputFormat::Jsonl => output::to_jsonl(transcript),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::to_csv(transcript),
        #[cfg(not(feature = "csv-output"))]
        OutputFormat::Csv => Err(csv_disabled()),
    }
}

/// Renders the omission report in the given format.
pub fn render_omissions(transcript: &Transcript, format: OutputFormat, render: &RenderConfig) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(output::omissions_to_markdown(transcript, render)),
        OutputFormat::Json => output::omissions_to_json(transcript),
        OutputFormat::Jsonl => output::omissions_to_jsonl(transcript),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::omissions_to_csv(transcript),
        #[cfg(not(feature = "csv-output"))]
        OutputFormat::Csv => Err(csv_disabled()),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Renders the transcript and writes it to `path`, creating parent directories.
pub fn write_transcript(
    transcript: &Transcript,
    path: &Path,
    format: OutputFormat,
    render: &RenderConfig,
    cast: &Cast,
) -> Result<()> {
    write_file(path, &render_transcript(transcript, format, render, cast)?)
}

/// Renders the omission report and writes it to `path`.
///
/// Returns `Ok(false)` without touching the filesystem when nothing was
/// omitted.
pub fn write_omissions(
    transcript: &Transcript,
    path: &Path,
    format: OutputFormat,
    render: &RenderConfig,
) -> Result<bool> {
    if !transcript.has_omissions() {
        return Ok(false);
    }
    write_file(path, &render_omissions(transcript, format, render)?)?;
    Ok(true)
}

/// `<title stem>_<timestamp>.<ext>`, the transcript file name.
///
/// ```rust
/// use sessionpack::config::RenderConfig;
/// use sessionpack::format::{OutputFormat, transcript_file_name};
///
/// let render = RenderConfig::new().with_title("Rise of the Runelords");
/// assert_eq!(
///     transcript_file_name(&render, "2025-03-02_18-30-00", OutputFormat::Markdown),
///     "Rise_of_the_Runelords_2025-03-02_18-30-00.md"
/// );
/// ```
pub fn transcript_file_name(render: &RenderConfig, timestamp: &str, format: OutputFormat) -> String {
    format!("{}_{}.{}", render.file_stem(), timestamp, format.extension())
}

/// The omission report file name, with characters that are illegal in file
/// names removed.
///
/// ```rust
/// use sessionpack::config::RenderConfig;
/// use sessionpack::format::{OutputFormat, omissions_file_name};
///
/// let render = RenderConfig::new().with_title("Kingmaker: Book 1");
/// assert_eq!(
///     omissions_file_name(&render, OutputFormat::Json),
///     "Omitted Messages — Kingmaker Book 1.json"
/// );
/// ```
pub fn omissions_file_name(render: &RenderConfig, format: OutputFormat) -> String {
    let title = output::omission_report_title(&render.title);
    let safe: String = title
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    format!("{}.{}", safe.trim(), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatMessage;
    use crate::config::PipelineConfig;
    use crate::core::models::SessionRecord;
    use crate::core::transcript::build_transcript;
    use std::str::FromStr;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("Markdown").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("ndjson").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("CSV").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_str("docx").is_err());
    }

    #[test]
    fn test_format_display_and_extension() {
        assert_eq!(OutputFormat::Markdown.to_string(), "Markdown");
        assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::default(), OutputFormat::Markdown);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("out.md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_path("/a/b/out.JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path("out.ndjson").unwrap(), OutputFormat::Jsonl);
        assert!(OutputFormat::from_path("out.docx").unwrap_err().is_invalid_format());
        assert!(OutputFormat::from_path("no_extension").is_err());
    }

    #[test]
    fn test_format_all() {
        assert_eq!(OutputFormat::all().len(), 4);
    }

    #[test]
    fn test_format_serde() {
        assert_eq!(serde_json::to_string(&OutputFormat::Jsonl).unwrap(), "\"jsonl\"");
        let parsed: OutputFormat = serde_json::from_str("\"markdown\"").unwrap();
        assert_eq!(parsed, OutputFormat::Markdown);
    }

    #[test]
    fn test_write_omissions_skips_clean_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("omitted").join("report.md");
        let sessions = [SessionRecord::new("One", vec![ChatMessage::new("A", "x")])];
        let transcript = build_transcript(&sessions, &PipelineConfig::default());

        let written = write_omissions(&transcript, &path, OutputFormat::Markdown, &RenderConfig::new()).unwrap();
        assert!(!written);
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempdir().unwrap();
        let sessions = [SessionRecord::new(
            "One",
            vec![ChatMessage::new("A", "x"), ChatMessage::new("A", "x")],
        )];
        let transcript = build_transcript(&sessions, &PipelineConfig::default());
        let render = RenderConfig::new();

        for format in [OutputFormat::Markdown, OutputFormat::Json, OutputFormat::Jsonl] {
            let path = dir.path().join("export").join(transcript_file_name(&render, "t", format));
            write_transcript(&transcript, &path, format, &render, &Cast::new()).unwrap();
            assert!(path.exists());

            let report = dir.path().join("export/omitted").join(omissions_file_name(&render, format));
            assert!(write_omissions(&transcript, &report, format, &render).unwrap());
            assert!(std::fs::read_to_string(&report).unwrap().contains("DUPLICATE"));
        }
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_render_csv() {
        let csv = render_transcript(&Transcript::new(), OutputFormat::Csv, &RenderConfig::new(), &Cast::new()).unwrap();
        assert_eq!(csv, "");
    }
}
