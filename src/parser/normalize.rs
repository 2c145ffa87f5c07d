use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// ESC[1;33m as well as the bare [1;33m left behind when a paste drops the escape byte.
static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\x1B\[|\[)(?:[0-9]+(?:;[0-9]+)*)?m").unwrap());

/// Canonical `\n` line endings, no color codes, no stray escape bytes.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

    // Removing one sequence can join its neighbours into a new one ("[[mm"),
    // so strip until a pass finds nothing.
    loop {
        let stripped = match ANSI_RE.replace_all(&text, "") {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(s),
        };
        let current = stripped.unwrap_or_else(|| text.clone());
        if current.contains('\x1B') {
            text = current.replace('\x1B', "");
            continue;
        }
        if current.len() == text.len() {
            return current;
        }
        text = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endings() {
        assert_eq!(normalize("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn escape_prefixed_codes() {
        assert_eq!(normalize("\x1B[1;33m推\x1B[m user"), "推 user");
    }

    #[test]
    fn bracket_only_codes() {
        assert_eq!(normalize("[1;37m→ [33mabc[m[0;33m: hi"), "→ abc: hi");
    }

    #[test]
    fn bare_escapes_removed() {
        assert_eq!(normalize("a\x1Bb\x1B"), "ab");
    }

    #[test]
    fn plain_brackets_survive() {
        assert_eq!(normalize("[新聞] 台積電 [12]"), "[新聞] 台積電 [12]");
    }

    #[test]
    fn empty_and_control_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\x1B[0m\x1B[1;31m\x1B"), "");
    }

    #[test]
    fn idempotent_on_nested_sequences() {
        for raw in [
            "[[mm",
            "[1\x1Bm",
            "[[1;3[mm3m",
            "\r\n\x1B[[0mm\r",
            "推 user: [33mhello[m 01/01 10:00",
            "",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
        }
        assert_eq!(normalize("[[mm"), "");
        assert_eq!(normalize("[1\x1Bm"), "");
    }
}
