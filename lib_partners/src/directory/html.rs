//! Markup stripping for upstream description fields.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("tag pattern is valid"))
}

/// Removes tags and comments, decodes the handful of entities the upstream CMS
/// emits, and collapses whitespace runs to a single space.
pub fn strip_html(input: &str) -> String {
    let without_tags = tag_pattern().replace_all(input, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        // last, so "&amp;lt;" stays a literal "&lt;"
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts a scalar JSON value into text. Objects, arrays and `null` become `None`.
pub(crate) fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Lenient text field: accepts strings and other scalars, maps everything else to `None`.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

/// Like [`deserialize_text`], with markup stripped.
pub(crate) fn deserialize_stripped<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_text(deserializer)?.map(|s| strip_html(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<p>Leading <b>ECM</b>\n partner.</p><br/>";
        assert_eq!(strip_html(html), "Leading ECM partner.");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(strip_html("R&amp;D&nbsp;team &lt;3"), "R&D team <3");
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn drops_comments_spanning_lines() {
        assert_eq!(strip_html("a<!-- hidden\n<b>x</b> -->b"), "a b");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(strip_html("No markup here"), "No markup here");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn scalars_become_text() {
        assert_eq!(value_to_text(serde_json::json!(42)), Some("42".to_string()));
        assert_eq!(value_to_text(serde_json::json!(null)), None);
        assert_eq!(value_to_text(serde_json::json!({"a": 1})), None);
    }
}
