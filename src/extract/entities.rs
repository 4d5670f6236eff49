//! Text clean-up shared by the extractors.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// Anything still shaped like an entity after decoding is unknown to us.
static LEFTOVER_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").unwrap());

/// Decode HTML entities; unknown entities become a space.
pub fn decode_entities(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    LEFTOVER_ENTITY_RE.replace_all(&decoded, " ").into_owned()
}

pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, " ").into_owned()
}

/// Strip markup, decode entities and collapse whitespace.
pub fn clean_text(html: &str) -> String {
    let decoded = decode_entities(&strip_tags(html));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `Some` only when the cleaned text is non-empty.
pub fn non_empty(html: &str) -> Option<String> {
    let text = clean_text(html);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
