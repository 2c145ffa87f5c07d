use std::sync::LazyLock;

use regex::Regex;

use crate::model::Reaction;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(標題|作者|時間)[:：\s]+(.+)$").unwrap());
static REACTION_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(推|噓|→)\s").unwrap());

/// Origin-station attribution that the board appends after the article body.
pub const FOOTER_MARKER: &str = "※ 發信站";
/// Footer line carrying the article URL; never a comment.
pub const ARTICLE_URL_MARKER: &str = "文章網址:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLabel {
    Title,
    Author,
    Date,
}

impl HeaderLabel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "標題" => Some(HeaderLabel::Title),
            "作者" => Some(HeaderLabel::Author),
            "時間" => Some(HeaderLabel::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Header { label: HeaderLabel, value: &'a str },
    Footer { offset: usize },
    Reaction(Reaction),
    Text(&'a str),
    Empty,
}

/// Classify one line (without its terminator). Header beats footer beats reaction.
pub fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Empty;
    }

    if let Some(caps) = HEADER_RE.captures(line) {
        if let (Some(label), Some(value)) = (HeaderLabel::from_label(&caps[1]), caps.get(2)) {
            return LineKind::Header {
                label,
                value: value.as_str(),
            };
        }
    }

    if let Some(offset) = line.find(FOOTER_MARKER) {
        return LineKind::Footer { offset };
    }

    if let Some(reaction) = REACTION_START_RE
        .captures(line)
        .and_then(|caps| Reaction::from_tag(&caps[1]))
    {
        return LineKind::Reaction(reaction);
    }

    LineKind::Text(line)
}

/// Lines of `text` with the byte offset each one starts at and whether it ended in `\n`.
pub fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str, bool)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        match raw.strip_suffix('\n') {
            Some(line) => (start, line, true),
            None => (start, raw, false),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields() {
        assert_eq!(
            classify("標題: [新聞] 台積電法說"),
            LineKind::Header {
                label: HeaderLabel::Title,
                value: "[新聞] 台積電法說"
            }
        );
        assert_eq!(
            classify("作者  abc123 (nick)  看板  Stock"),
            LineKind::Header {
                label: HeaderLabel::Author,
                value: "abc123 (nick)  看板  Stock"
            }
        );
        assert!(matches!(
            classify("時間：Wed Jan  1 10:00:00 2025"),
            LineKind::Header { label: HeaderLabel::Date, .. }
        ));
    }

    #[test]
    fn header_needs_line_start_and_value() {
        assert!(matches!(classify("  標題: indented"), LineKind::Text(_)));
        assert!(matches!(classify("收件者: someone"), LineKind::Text(_)));
        assert!(matches!(classify("標題:"), LineKind::Text(_)));
    }

    #[test]
    fn footer_marker_offset() {
        let line = "本文 ※ 發信站: 批踢踢實業坊(ptt.cc)";
        assert_eq!(classify(line), LineKind::Footer { offset: "本文 ".len() });
    }

    #[test]
    fn reaction_lines() {
        assert_eq!(classify("推 user1: good"), LineKind::Reaction(Reaction::Push));
        assert_eq!(classify("  噓 user2: bad"), LineKind::Reaction(Reaction::Boo));
        assert_eq!(classify("→ user3: meh"), LineKind::Reaction(Reaction::Arrow));
        assert!(matches!(classify("推薦這篇"), LineKind::Text(_)));
    }

    #[test]
    fn empty_lines() {
        assert_eq!(classify(""), LineKind::Empty);
        assert_eq!(classify("   \t"), LineKind::Empty);
    }

    #[test]
    fn offsets_track_terminators() {
        let got: Vec<_> = lines_with_offsets("ab\ncd\n\nef").collect();
        assert_eq!(
            got,
            vec![(0, "ab", true), (3, "cd", true), (6, "", true), (7, "ef", false)]
        );
        assert_eq!(lines_with_offsets("").count(), 0);
    }
}
