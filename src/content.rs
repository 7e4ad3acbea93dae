//! Content file parsing: metadata block splitting and header parsing.
//!
//! A content file is UTF-8 text with an optional leading metadata block:
//!
//! ```text
//! /*
//! Title: Hello World
//! Date: 2021/05/05
//! Template: post
//! */
//! # Hello
//!
//! Markdown body...
//! ```
//!
//! The block is delimited by `/*` and `*/` at the top of the file (only
//! blank lines may precede it). Inside, each line is a `key: value` header.
//! Both halves are forgiving by design:
//!
//! - No block, or a block that never closes → no metadata, the whole file
//!   is body. Never an error.
//! - A header line without a colon is ignored.
//! - Keys are lower-cased; values are trimmed; everything stays a string.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Case-insensitive header map parsed from a metadata block.
pub type MetaMap = BTreeMap<String, String>;

/// Pattern for the leading metadata block: optional blank lines, then
/// `/*`, then whole header lines up to a `*/` that starts a line, then the
/// body. The header match is greedy, so a `*/` line inside the block only
/// closes it when no later line-starting `*/` exists.
fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\A\n*/\*\n*(?P<meta>(?:.*\n)*)\*/(?P<body>(?s:.*))\z").unwrap()
    })
}

/// Split raw file text into its metadata block and body.
///
/// Returns `(meta, body)`. When no well-formed block is present (including
/// a `/*` that is never closed), the metadata is empty and the entire input
/// is the body. Splitting never fails.
pub fn split_content(raw: &str) -> (&str, &str) {
    match block_pattern().captures(raw) {
        Some(caps) => {
            let meta = caps.name("meta").map_or("", |m| m.as_str());
            let body = caps.name("body").map_or("", |m| m.as_str());
            (meta, body)
        }
        None => ("", raw),
    }
}

/// Parse `key: value` header lines from a metadata block.
///
/// Each line is split on its first colon; lines without one are ignored.
/// Keys are lower-cased, values trimmed. No type coercion; callers treat
/// fields like `date` as opaque strings.
pub fn parse_meta(meta: &str) -> MetaMap {
    let mut headers = MetaMap::new();
    for line in meta.lines() {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.to_lowercase(), value.trim().to_string());
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // split_content
    // =========================================================================

    #[test]
    fn splits_block_and_body() {
        let raw = "/*\nTitle: Hello\n*/\n# Body\n";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "Title: Hello\n");
        assert_eq!(body, "\n# Body\n");
    }

    #[test]
    fn allows_leading_blank_lines() {
        let raw = "\n\n/*\nTitle: Hi\n*/body";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "Title: Hi\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn no_block_means_whole_file_is_body() {
        let raw = "# Just markdown\n\nNo header here.\n";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "");
        assert_eq!(body, raw);
    }

    #[test]
    fn unclosed_block_means_whole_file_is_body() {
        let raw = "/*\nTitle: Lost\nNo closing delimiter\n";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "");
        assert_eq!(body, raw);
    }

    #[test]
    fn leading_text_before_block_is_not_a_block() {
        // The block must be at the top of the file (blank lines aside).
        let raw = "intro\n/*\nTitle: Nope\n*/\nbody";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "");
        assert_eq!(body, raw);
    }

    #[test]
    fn empty_input() {
        assert_eq!(split_content(""), ("", ""));
    }

    #[test]
    fn empty_block() {
        let (meta, body) = split_content("/*\n*/rest");
        assert_eq!(meta, "");
        assert_eq!(body, "rest");
    }

    #[test]
    fn close_delimiter_inside_a_body_line_is_ignored() {
        let raw = "/*\nA: 1\n*/ body with */ inside";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "A: 1\n");
        assert_eq!(body, " body with */ inside");
    }

    #[test]
    fn block_extends_to_the_last_line_starting_close_delimiter() {
        let raw = "/*\nA: 1\n*/\nmore: stuff\n*/\nbody\n";
        let (meta, body) = split_content(raw);
        assert_eq!(meta, "A: 1\n*/\nmore: stuff\n");
        assert_eq!(body, "\nbody\n");
    }

    // =========================================================================
    // parse_meta
    // =========================================================================

    #[test]
    fn parses_headers() {
        let meta = parse_meta("Title: Hello World\nAuthor: dt\n");
        assert_eq!(meta.get("title").map(String::as_str), Some("Hello World"));
        assert_eq!(meta.get("author").map(String::as_str), Some("dt"));
    }

    #[test]
    fn keys_are_lower_cased() {
        let meta = parse_meta("TITLE: Caps\nDaTe: 2020/01/01");
        assert_eq!(meta.get("title").map(String::as_str), Some("Caps"));
        assert_eq!(meta.get("date").map(String::as_str), Some("2020/01/01"));
    }

    #[test]
    fn values_are_trimmed() {
        let meta = parse_meta("title:    padded value   ");
        assert_eq!(meta.get("title").map(String::as_str), Some("padded value"));
    }

    #[test]
    fn splits_on_first_colon_only() {
        let meta = parse_meta("url: http://example.com/a:b");
        assert_eq!(
            meta.get("url").map(String::as_str),
            Some("http://example.com/a:b")
        );
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let meta = parse_meta("just a note\ntitle: Real\n---\n");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("title").map(String::as_str), Some("Real"));
    }

    #[test]
    fn empty_value_is_kept_as_empty_string() {
        let meta = parse_meta("description:");
        assert_eq!(meta.get("description").map(String::as_str), Some(""));
    }

    #[test]
    fn later_duplicate_key_wins() {
        let meta = parse_meta("title: First\ntitle: Second");
        assert_eq!(meta.get("title").map(String::as_str), Some("Second"));
    }

    // =========================================================================
    // split + parse together
    // =========================================================================

    #[test]
    fn full_document_flow() {
        let raw = "/*\nTitle: Post\nDate: 2021/05/05\n*/\n# Heading\n\ntext\n";
        let (meta_str, body) = split_content(raw);
        let meta = parse_meta(meta_str);
        assert_eq!(meta.get("title").map(String::as_str), Some("Post"));
        assert_eq!(meta.get("date").map(String::as_str), Some("2021/05/05"));
        assert!(body.contains("# Heading"));
    }
}
