use std::sync::LazyLock;

use regex::Regex;

use crate::parser::sections::{Section, SectionKind};

static QUOTE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^> ").unwrap());

const HORIZONTAL_RULE: &str = "───────────────────────────────────────";

/// Article text between the header block and the footer marker.
///
/// Falls back to the whole text when the layout has no body region.
pub fn extract(text: &str, sections: &[Section]) -> String {
    let body = sections
        .iter()
        .find(|s| s.kind == SectionKind::Body)
        .map(|s| s.slice(text).trim())
        .unwrap_or(text);

    let without_rule = body.replace(HORIZONTAL_RULE, "");
    QUOTE_PREFIX_RE
        .replace_all(&without_rule, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sections::cluster_sections;

    fn body(text: &str) -> String {
        extract(text, &cluster_sections(text))
    }

    #[test]
    fn between_header_and_footer() {
        let text = "作者: a\n標題: t\n時間: now\n\n  hello\nworld\n\n※ 發信站: 批踢踢\n推 u: x\n";
        assert_eq!(body(text), "hello\nworld");
    }

    #[test]
    fn no_header_cuts_at_footer() {
        assert_eq!(body("just the body\n--\n※ 發信站: x\n推 a: b"), "just the body\n--");
    }

    #[test]
    fn reflowed_paste_cuts_at_footer_inside_header_line() {
        let text = "作者: abc123 標題: t 時間: Wed body text ※ 發信站: 批踢踢實業坊 推 u1: ok";
        assert_eq!(body(text), "作者: abc123 標題: t 時間: Wed body text");
    }

    #[test]
    fn no_header_no_footer_is_whole_text() {
        assert_eq!(body("  only text  "), "only text");
    }

    #[test]
    fn inverted_span_falls_back_to_whole_text() {
        let text = "※ 發信站: x\n時間: now\nbody";
        assert_eq!(body(text), text);
    }

    #[test]
    fn empty_span_falls_back_to_whole_text() {
        let text = "時間: now\n※ 發信站: x";
        assert_eq!(body(text), text);
    }

    #[test]
    fn strips_rule_and_quote_markers() {
        let text = format!("時間: now\n> quoted line\n{}\n> more\n※ 發信站", HORIZONTAL_RULE);
        assert_eq!(body(&text), "quoted line\n\nmore");
    }
}
