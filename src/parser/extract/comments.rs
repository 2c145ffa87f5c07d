use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::{Comment, Reaction};
use crate::parser::lines::ARTICLE_URL_MARKER;

// Colon and spacing are loose because stripped color codes leave odd gaps.
static PRIMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(推|噓|→)\s+([a-zA-Z0-9_]+)\s*:?\s*(.+?)\s*([0-9]{2}/[0-9]{2}\s[0-9]{2}:[0-9]{2})?$").unwrap()
});
static FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(推|噓|→)\s+([a-zA-Z0-9_]+)\s*:?\s*(.+)").unwrap());
static TRAILING_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2}/[0-9]{2}\s[0-9]{2}:[0-9]{2})$").unwrap());

/// Longer matches are the pattern swallowing something that is not a comment.
pub const MAX_CONTENT_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Primary,
    LineFallback,
}

/// Comments in file order, plus which scan produced them.
///
/// The fallback scan only runs when the primary scan finds nothing at all;
/// results of the two are never mixed.
pub fn extract(text: &str) -> (Vec<Comment>, ScanMode) {
    let primary = scan_primary(text);
    if !primary.is_empty() {
        debug!(count = primary.len(), "primary comment scan");
        return (primary, ScanMode::Primary);
    }

    let fallback = scan_fallback(text);
    debug!(count = fallback.len(), "primary comment scan empty, used line fallback");
    (fallback, ScanMode::LineFallback)
}

pub fn scan_primary(text: &str) -> Vec<Comment> {
    let mut comments = Vec::new();

    for line in text.lines() {
        let Some(caps) = PRIMARY_RE.captures(line) else {
            continue;
        };
        let Some(reaction) = Reaction::from_tag(&caps[1]) else {
            continue;
        };
        let content = caps[3].trim();

        if content.is_empty()
            || content.contains(ARTICLE_URL_MARKER)
            || content.chars().count() > MAX_CONTENT_CHARS
        {
            continue;
        }

        comments.push(Comment {
            id: format!("c-txt-{}", comments.len()),
            reaction,
            user: caps[2].to_string(),
            content: content.to_string(),
            timestamp: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
        });
    }

    comments
}

pub fn scan_fallback(text: &str) -> Vec<Comment> {
    let mut comments = Vec::new();

    for line in text.lines() {
        let Some(caps) = FALLBACK_RE.captures(line) else {
            continue;
        };
        let Some(reaction) = Reaction::from_tag(&caps[1]) else {
            continue;
        };
        if caps[3].contains(ARTICLE_URL_MARKER) {
            continue;
        }

        let (content, timestamp) = split_trailing_time(caps[3].trim());
        comments.push(Comment {
            id: format!("c-txt-fb-{}", comments.len()),
            reaction,
            user: caps[2].to_string(),
            content: content.to_string(),
            timestamp: timestamp.to_string(),
        });
    }

    comments
}

fn split_trailing_time(content: &str) -> (&str, &str) {
    match TRAILING_TIME_RE.find(content) {
        Some(m) => (content[..m.start()].trim(), m.as_str()),
        None => (content, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_fields() {
        let c = scan_primary("推 user1: good 01/01 10:00\n噓 user2: bad\n→ user3:meh   12/31 23:59\n");
        assert_eq!(c.len(), 3);
        assert_eq!(c[0].reaction, Reaction::Push);
        assert_eq!(c[0].user, "user1");
        assert_eq!(c[0].content, "good");
        assert_eq!(c[0].timestamp, "01/01 10:00");
        assert_eq!(c[1].reaction, Reaction::Boo);
        assert_eq!(c[1].content, "bad");
        assert_eq!(c[1].timestamp, "");
        assert_eq!(c[2].reaction, Reaction::Arrow);
        assert_eq!(c[2].content, "meh");
        assert_eq!(c[2].timestamp, "12/31 23:59");
        let ids: Vec<&str> = c.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["c-txt-0", "c-txt-1", "c-txt-2"]);
    }

    #[test]
    fn primary_keeps_ip_prefix_in_content() {
        let c = scan_primary("推 abc: 漲停 1.2.3.4 01/02 09:05");
        assert_eq!(c[0].content, "漲停 1.2.3.4");
        assert_eq!(c[0].timestamp, "01/02 09:05");
    }

    #[test]
    fn full_width_digits_are_not_a_timestamp() {
        let c = scan_primary("推 user1: 漲 ０１/０１ １０:００");
        assert_eq!(c[0].content, "漲 ０１/０１ １０:００");
        assert_eq!(c[0].timestamp, "");

        let c = scan_fallback("推 user1: 漲 ０１/０１ １０:００");
        assert_eq!(c[0].timestamp, "");
    }

    #[test]
    fn primary_drops_long_content() {
        let line = format!("推 user1: {}", "x".repeat(MAX_CONTENT_CHARS + 1));
        assert!(scan_primary(&line).is_empty());
        let line = format!("推 user1: {}", "字".repeat(MAX_CONTENT_CHARS));
        assert_eq!(scan_primary(&line).len(), 1);
    }

    #[test]
    fn primary_drops_url_footer() {
        assert!(scan_primary("→ https: 文章網址: https://www.ptt.cc/bbs/Stock/x.html").is_empty());
        assert!(scan_primary("推 site 文章網址: x").is_empty());
    }

    #[test]
    fn primary_ignores_non_comment_lines() {
        let c = scan_primary("今天大盤\n推薦\n推\n→\n");
        assert!(c.is_empty());
    }

    #[test]
    fn primary_content_never_exceeds_cap_or_has_marker() {
        let text = std::fs::read_to_string("tests/fixtures/terminal_paste.txt").unwrap();
        let text = crate::parser::normalize::normalize(&text);
        let c = scan_primary(&text);
        assert!(!c.is_empty());
        for x in &c {
            assert!(x.content.chars().count() <= MAX_CONTENT_CHARS);
            assert!(!x.content.contains(ARTICLE_URL_MARKER));
            assert!(!x.content.is_empty());
        }
    }

    #[test]
    fn fallback_only_when_primary_empty() {
        let (c, mode) = extract("推 a: short\n");
        assert_eq!(mode, ScanMode::Primary);
        assert_eq!(c.len(), 1);

        let long = format!("推 longuser: {} 03/04 05:06\n→ u2: 文章網址: x\n", "很長".repeat(100));
        let (c, mode) = extract(&long);
        assert_eq!(mode, ScanMode::LineFallback);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].id, "c-txt-fb-0");
        assert_eq!(c[0].user, "longuser");
        assert_eq!(c[0].content, "很長".repeat(100));
        assert_eq!(c[0].timestamp, "03/04 05:06");
    }

    #[test]
    fn fallback_without_time() {
        let c = scan_fallback("  噓 u_1 :   whatever you say");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].reaction, Reaction::Boo);
        assert_eq!(c[0].user, "u_1");
        assert_eq!(c[0].content, "whatever you say");
        assert_eq!(c[0].timestamp, "");
    }

    #[test]
    fn nothing_found_is_empty_not_error() {
        let (c, mode) = extract("no reactions here\n");
        assert!(c.is_empty());
        assert_eq!(mode, ScanMode::LineFallback);
    }
}
