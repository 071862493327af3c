//! Idempotent tag injection into finished HTML pages.
//!
//! Both passes share the same insertion engine: remove every existing
//! copy of the managed fragment, then insert one fresh copy before the
//! last matching anchor tag. Running a pass twice yields byte-identical
//! output.

pub mod canonical;
pub mod tracking;

use regex::Regex;
use std::sync::LazyLock;

pub(crate) static RE_HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

pub(crate) static RE_BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

/// Placement when none of the anchor tags is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fallback {
    /// Put the fragment at the very top of the document
    Prepend,
    /// Put the fragment at the very end of the document
    Append,
}

/// Insert `fragment` before the last occurrence of the first anchor that
/// matches, trying anchors in order. The fragment is inserted verbatim;
/// callers own its surrounding newlines.
pub(crate) fn insert_before_last(
    html: &str,
    fragment: &str,
    anchors: &[&Regex],
    fallback: Fallback,
) -> String {
    for anchor in anchors {
        if let Some(found) = anchor.find_iter(html).last() {
            let mut out = String::with_capacity(html.len() + fragment.len());
            out.push_str(&html[..found.start()]);
            out.push_str(fragment);
            out.push_str(&html[found.start()..]);
            return out;
        }
    }

    match fallback {
        Fallback::Prepend => format!("{fragment}{html}"),
        Fallback::Append => format!("{html}{fragment}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_before_single_anchor() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let out = insert_before_last(html, "<X>", &[&RE_HEAD_CLOSE], Fallback::Prepend);
        assert_eq!(
            out,
            "<html><head><title>t</title><X></head><body></body></html>"
        );
    }

    #[test]
    fn test_last_occurrence_wins() {
        let html = "</head>middle</head>tail";
        let out = insert_before_last(html, "<X>", &[&RE_HEAD_CLOSE], Fallback::Prepend);
        assert_eq!(out, "</head>middle<X></head>tail");
    }

    #[test]
    fn test_anchor_order_tried_in_sequence() {
        let html = "<body>content</body>";
        let out = insert_before_last(
            html,
            "<X>",
            &[&RE_HEAD_CLOSE, &RE_BODY_CLOSE],
            Fallback::Append,
        );
        assert_eq!(out, "<body>content<X></body>");
    }

    #[test]
    fn test_case_insensitive_and_spaced_anchor() {
        let html = "<HEAD>x</HEAD >y";
        let out = insert_before_last(html, "<X>", &[&RE_HEAD_CLOSE], Fallback::Prepend);
        assert_eq!(out, "<HEAD>x<X></HEAD >y");
    }

    #[test]
    fn test_fallback_prepend() {
        let out = insert_before_last("no anchors", "<X>\n", &[&RE_HEAD_CLOSE], Fallback::Prepend);
        assert_eq!(out, "<X>\nno anchors");
    }

    #[test]
    fn test_fallback_append() {
        let out = insert_before_last("no anchors", "\n<X>", &[&RE_BODY_CLOSE], Fallback::Append);
        assert_eq!(out, "no anchors\n<X>");
    }
}
