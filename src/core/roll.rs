//! Dice roll summaries.
//!
//! Roll cards are HTML blocks carrying a `dice-roll` class with the formula
//! and total in `.dice-formula` and `.dice-total` elements. [`render_roll`]
//! turns one into a single line:
//!
//! ```rust
//! use sessionpack::core::roll::render_roll;
//!
//! let card = r#"<div class="dice-roll">
//!     <div class="dice-formula">1d20 + 5</div>
//!     <h4 class="dice-total">17</h4>
//! </div>"#;
//!
//! assert_eq!(
//!     render_roll("Seoni", card, "<b>Perception</b>").as_deref(),
//!     Some("Seoni rolls 1d20 + 5 -> 17 (Perception)")
//! );
//! assert_eq!(render_roll("Seoni", "<p>no roll here</p>", ""), None);
//! ```

use scraper::{Html, Selector};

use super::normalize::strip_tags;

/// Substring that marks a roll card.
pub const ROLL_MARKER: &str = "dice-roll";

/// Placeholder for a missing formula or total.
pub const MISSING_FIELD: &str = "?";

const FORMULA_SELECTOR: &str = ".dice-formula";
const TOTAL_SELECTOR: &str = ".dice-total";

/// Returns `true` if the content is a roll card.
pub fn is_roll(content: &str) -> bool {
    content.contains(ROLL_MARKER)
}

/// Renders `"<speaker> rolls <formula> -> <total>"`, plus ` (<flavor>)` when
/// the flavor is non-empty after tag stripping.
///
/// Returns `None` when the content is not a roll card.
pub fn render_roll(speaker: &str, content: &str, flavor: &str) -> Option<String> {
    if !is_roll(content) {
        return None;
    }

    let card = Html::parse_fragment(content);
    let formula = first_text(&card, FORMULA_SELECTOR).unwrap_or_else(|| MISSING_FIELD.into());
    let total = first_text(&card, TOTAL_SELECTOR).unwrap_or_else(|| MISSING_FIELD.into());

    let mut summary = format!("{speaker} rolls {formula} -> {total}");
    let flavor = strip_tags(flavor);
    let flavor = flavor.trim();
    if !flavor.is_empty() {
        summary.push_str(&format!(" ({flavor})"));
    }
    Some(summary)
}

/// Text of the first element matching `selector`, each text node trimmed.
/// Empty text counts as missing.
fn first_text(card: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = card.select(&selector).next()?;
    let text: String = element.text().map(str::trim).collect();
    (!text.is_empty()).then_some(text)
}
