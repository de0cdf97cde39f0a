//! Benchmarks for sessionpack classification and rendering.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- classify`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use sessionpack::ChatMessage;
use sessionpack::config::{Cast, PipelineConfig, RenderConfig};
use sessionpack::core::models::SessionRecord;
use sessionpack::core::normalize::normalize_text;
use sessionpack::core::output::{to_jsonl, to_markdown};
use sessionpack::core::pipeline::classify_messages;
use sessionpack::core::transcript::build_transcript;
use sessionpack::parser::SessionParser;

const ROLL: &str = r#"<div class="dice-roll"><div class="dice-result"><div class="dice-formula">1d20 + 5</div><div class="dice-tooltip"><section class="tooltip-part"><span class="part-formula">1d20</span></section></div><h4 class="dice-total">17</h4></div></div>"#;

// =============================================================================
// Test Data Generators
// =============================================================================

/// A realistic mix: dialogue, narration, rolls, whispers, AFK and repeats.
fn generate_messages(count: usize) -> Vec<ChatMessage> {
    (0..count)
        .map(|i| {
            let speaker = ["Amiri", "Kyra", "Seoni", "GM"][i % 4];
            match i % 10 {
                0 => ChatMessage::new(speaker, ROLL).with_flavor("<b>Attack</b>"),
                1 => ChatMessage::new(speaker, format!("<p>Whisper number {i}</p>")).with_whisper("gm"),
                2 => ChatMessage::new(speaker, "<p>brb</p>"),
                3 => ChatMessage::new(speaker, ROLL).with_roll_mode("gmroll"),
                4 => ChatMessage::new(speaker, format!("<p>### Scene {i}</p>")),
                5 | 6 => ChatMessage::new("Kyra", "<p>Same line <em>again</em></p>"),
                _ => ChatMessage::new(
                    speaker,
                    format!("<div><p>Message number {i} with <strong>some</strong> markup and a Critical Success.</p></div>"),
                ),
            }
        })
        .collect()
}

fn generate_session_json(count: usize) -> String {
    let messages = serde_json::to_string(&generate_messages(count)).unwrap();
    format!(r#"{{"data": {{"title": "Bench", "created": 1700000000000}}, "messages": {messages}}}"#)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_normalize(c: &mut Criterion) {
    let html = "<div class=\"message\"><p>The <strong>ancient</strong> door &amp; its   runes</p>\n<p>glow faintly.</p></div>";
    c.bench_function("normalize_text", |b| b.iter(|| normalize_text(black_box(Some(html)))));
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let config = PipelineConfig::default();

    for size in [100, 1_000, 10_000] {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &messages, |b, messages| {
            b.iter(|| classify_messages(black_box(messages), &config));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_session");
    let parser = SessionParser::new();

    for size in [1_000, 10_000] {
        let json = generate_session_json(size);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| parser.parse_str(black_box(json), "bench.json").unwrap());
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let sessions: Vec<_> = (0..10)
        .map(|i| SessionRecord::new(format!("Session {i}"), generate_messages(1_000)))
        .collect();
    let transcript = build_transcript(&sessions, &PipelineConfig::default());
    let render = RenderConfig::default();
    let cast = Cast::from_kv_str("Amiri = a\nKyra = k");

    group.bench_function("markdown", |b| b.iter(|| to_markdown(black_box(&transcript), &render, &cast)));
    group.bench_function("jsonl", |b| b.iter(|| to_jsonl(black_box(&transcript)).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify, bench_parse, bench_render);
criterion_main!(benches);
