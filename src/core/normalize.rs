//! HTML to plain text.
//!
//! Chat content arrives as HTML fragments (`<p>`, `<em>`, roll cards built
//! from nested `<div>`s). [`normalize_text`] keeps only the text nodes, joined
//! directly with no separator, then collapses whitespace. It removes structure,
//! it does not try to rebuild word boundaries: `<b>Fire</b>ball` becomes
//! `Fireball`.
//!
//! ```rust
//! use sessionpack::core::normalize::normalize_text;
//!
//! assert_eq!(normalize_text(Some("<p>Hello\n   <em>there</em></p>")), "Hello there");
//! assert_eq!(normalize_text(Some("<div><img src=\"x.png\"></div>")), "");
//! assert_eq!(normalize_text(None), "");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Strips markup and collapses whitespace.
///
/// Entities are decoded, every run of whitespace (newlines and non-breaking
/// spaces included) becomes one space, and the result is trimmed. `None` and
/// markup-only input yield an empty string.
///
/// Normalizing again is a no-op only when the output holds no `<` or `&`.
/// Decoded entities are read as markup on a second pass, so `&lt;grin&gt; ok`
/// becomes `<grin> ok`, which in turn becomes `ok`.
pub fn normalize_text(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    if raw.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes `<...>` tags and nothing else.
///
/// Used for roll flavor, which is shown as-is apart from its markup.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_segments_join_directly() {
        assert_eq!(normalize_text(Some("<b>Fire</b>ball")), "Fireball");
        assert_eq!(normalize_text(Some("<p>one</p><p>two</p>")), "onetwo");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            normalize_text(Some("  <p>a\n\n\tb</p>   <p> c </p> ")),
            "a b c"
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(normalize_text(Some("Tom &amp; Jerry")), "Tom & Jerry");
        assert_eq!(normalize_text(Some("a&nbsp;&nbsp;b")), "a b");
    }

    #[test]
    fn test_markup_only_is_empty() {
        assert_eq!(normalize_text(Some("<p></p><br/>")), "");
        assert_eq!(normalize_text(Some("   ")), "");
        assert_eq!(normalize_text(Some("")), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize_text(Some("Hello")), "Hello");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_text(Some("<div class=\"x\"> Roll  <span>for</span>\ninitiative </div>"));
        assert_eq!(once, "Roll for initiative");
        assert_eq!(normalize_text(Some(once.as_str())), once);
    }

    #[test]
    fn test_decoded_markup_not_stable() {
        let once = normalize_text(Some("&lt;grin&gt; ok"));
        assert_eq!(once, "<grin> ok");
        assert_eq!(normalize_text(Some(once.as_str())), "ok");
    }

    #[test]
    fn test_strip_tags_keeps_spacing() {
        assert_eq!(strip_tags("<b>Attack</b> roll "), "Attack roll ");
        assert_eq!(strip_tags("no tags"), "no tags");
    }
}
