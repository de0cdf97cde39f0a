//! # sessionpack CLI
//!
//! Command-line interface for the sessionpack library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use sessionpack::SessionpackError;
use sessionpack::cli::Args;
use sessionpack::config::{Cast, PipelineConfig, RenderConfig, read_kv_file};
use sessionpack::core::{OmissionReason, Transcript, process_session};
use sessionpack::format::{
    OutputFormat, omissions_file_name, transcript_file_name, write_omissions, write_transcript,
};
use sessionpack::parser::{SessionParser, discover_sessions};

/// Subdirectory of the export directory that receives the omission report.
const OMITTED_DIR: &str = "omitted";

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "sessionpack=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), SessionpackError> {
    let total_start = Instant::now();
    let format: OutputFormat = args.format.into();

    println!("📦 sessionpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Export:  {}", args.export.display());
    println!("📄 Format:  {}", format);
    println!();

    let (pipeline, mut render) = load_config(&args.config)?;
    if let Some(ref title) = args.title {
        render = render.with_title(title.clone());
    }
    let cast = load_cast(&args.actors)?;
    println!("🏷️  Title:   {}", render.title);
    println!();

    let files = discover_sessions(&args.input)?;
    if files.is_empty() {
        println!("⚠️  No session files found in {}", args.input.display());
        return Ok(());
    }
    println!("⏳ Processing {} session(s)...", files.len());

    let parser = SessionParser::new();
    let mut transcript = Transcript::new();
    for (i, path) in files.iter().enumerate() {
        let session = parser.parse(path)?;
        let outcome = process_session(i + 1, &session, &pipeline);

        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!(
            "   [{}/{}] {} → {} blocks, {} omitted",
            i + 1,
            files.len(),
            name,
            outcome.blocks.len() - 1,
            outcome.omissions.len()
        );
        let duplicates = outcome.count(OmissionReason::Duplicate);
        if duplicates > 0 {
            println!("         removed {} consecutive duplicate message(s)", duplicates);
        }
        transcript.push(outcome);
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let output_path = args
        .export
        .join(transcript_file_name(&render, &timestamp, format));
    println!("💾 Writing {}...", format);
    write_transcript(&transcript, &output_path, format, &render, &cast)?;

    let report_path = args
        .export
        .join(OMITTED_DIR)
        .join(omissions_file_name(&render, format));
    let report_written = write_omissions(&transcript, &report_path, format, &render)?;

    println!();
    println!("✅ Done! Transcript saved to {}", output_path.display());
    if report_written {
        println!("🗒️  Omission report saved to {}", report_path.display());
    } else {
        println!("🗒️  Nothing was omitted, no report written");
    }

    let stats = transcript.stats();
    println!();
    println!("📊 Summary:");
    println!("   Sessions:  {}", stats.sessions);
    println!("   Blocks:    {}", stats.blocks);
    println!("   Omitted:   {}", stats.total_omitted());
    for reason in OmissionReason::all() {
        let count = stats.omitted(*reason);
        if count > 0 {
            println!("     {:<16} {}", reason.as_str(), count);
        }
    }
    println!("   Time:      {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Reads the pipeline and render settings, or defaults if the file is missing.
fn load_config(path: &Path) -> Result<(PipelineConfig, RenderConfig), SessionpackError> {
    match read_kv_file(path)? {
        Some(text) => {
            println!("⚙️  Loaded configuration from {}", path.display());
            Ok((PipelineConfig::from_kv_str(&text), RenderConfig::from_kv_str(&text)))
        }
        None => {
            println!("⚙️  No {} found, using defaults", path.display());
            Ok((PipelineConfig::default(), RenderConfig::default()))
        }
    }
}

fn load_cast(path: &Path) -> Result<Cast, SessionpackError> {
    match read_kv_file(path)? {
        Some(text) => {
            let cast = Cast::from_kv_str(&text);
            println!("🎭 Loaded {} actor(s) from {}", cast.len(), path.display());
            Ok(cast)
        }
        None => {
            println!("🎭 No {} found, skipping cast list", path.display());
            Ok(Cast::new())
        }
    }
}
