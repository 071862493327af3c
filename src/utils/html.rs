//! Small text helpers for reading and emitting markup.
//!
//! The feed pass pulls titles and descriptions out of finished HTML
//! pages, so it needs to go the other way too: strip tags, decode the
//! entities the page author wrote, and normalize whitespace.

use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:#x?[0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Escape the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Remove markup tags, leaving only text content.
pub fn strip_tags(s: &str) -> String {
    RE_TAG.replace_all(s, "").into_owned()
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    RE_WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Decode the common named entities plus numeric character references.
/// Unknown entities pass through untouched.
pub fn unescape(s: &str) -> String {
    RE_ENTITY
        .replace_all(s, |caps: &regex::Captures| {
            let entity = &caps[0];
            match entity {
                "&amp;" => "&".to_string(),
                "&lt;" => "<".to_string(),
                "&gt;" => ">".to_string(),
                "&quot;" => "\"".to_string(),
                "&apos;" | "&#39;" => "'".to_string(),
                "&nbsp;" => " ".to_string(),
                _ => decode_numeric(entity).unwrap_or_else(|| entity.to_string()),
            }
        })
        .into_owned()
}

/// Decode `&#NNN;` and `&#xHHH;` references.
fn decode_numeric(entity: &str) -> Option<String> {
    let body = entity.strip_prefix("&#")?.strip_suffix(';')?;
    let code = match body.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    char::from_u32(code).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_unescape_named() {
        assert_eq!(unescape("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(unescape("&quot;hi&quot; it&#39;s"), "\"hi\" it's");
    }

    #[test]
    fn test_unescape_numeric() {
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("&#x2014;"), "\u{2014}");
    }

    #[test]
    fn test_unescape_unknown_passes_through() {
        assert_eq!(unescape("&unknown; &#xZZ;"), "&unknown; &#xZZ;");
    }
}
