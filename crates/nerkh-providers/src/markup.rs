//! Markup helpers shared by the shapes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

/// Any tag, opening or closing
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid regex"));

/// Build a matcher for the first element carrying `attr="value"`.
///
/// Captures the element's inner text up to the next closing tag.
pub fn marker_pattern(attr: &str, value: &str) -> Result<Regex> {
    let pattern = format!(
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*?\s{}\s*=\s*["']{}["'][^>]*>(.*?)</"#,
        regex::escape(attr),
        regex::escape(value),
    );
    Ok(Regex::new(&pattern)?)
}

/// Inner text of the first element matched by `marker`, stripped and trimmed
pub fn marked_text(html: &str, marker: &Regex) -> Option<String> {
    let inner = marker.captures(html)?.get(1)?.as_str();
    let text = strip_markup(inner);
    (!text.is_empty()).then_some(text)
}

/// Drop tags, decode the common entities and trim
pub fn strip_markup(fragment: &str) -> String {
    let text = TAG_REGEX.replace_all(fragment, "");
    decode_entities(&text).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
