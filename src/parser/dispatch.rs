use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ExtractError, Result};

static ARTICLE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ptt\.cc/bbs/[A-Za-z0-9_-]+/M\.[0-9]+\.A\.[A-Za-z0-9_]+\.html").unwrap());

const WEBMAIL_HOST: &str = "mail.google.com";

/// A single-line article URL at most this long is fetched rather than parsed.
pub const MAX_LOCATOR_CHARS: usize = 250;
/// A single-line webmail link under this length is rejected outright.
pub const MAX_WEBMAIL_LINK_CHARS: usize = 200;
/// Anything shorter cannot hold an article.
pub const MIN_INPUT_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Article URL to fetch, always with a scheme.
    Locator(String),
    /// Trimmed text to parse as-is.
    Paste(String),
}

/// Decide from the shape of `input` whether it is a URL to fetch or text to parse.
pub fn route(input: &str) -> Result<Route> {
    let trimmed = input.trim();
    let len = trimmed.chars().count();
    let single_line = !trimmed.contains('\n');

    if let Some(m) = ARTICLE_URL_RE.find(trimmed) {
        if single_line && len < MAX_LOCATOR_CHARS {
            let url = if trimmed.starts_with("http") {
                trimmed.to_string()
            } else {
                format!("https://{}", m.as_str())
            };
            return Ok(Route::Locator(url));
        }
    }

    // A long or multi-line input mentioning webmail is a pasted mail, not a link.
    if trimmed.contains(WEBMAIL_HOST) && single_line && len < MAX_WEBMAIL_LINK_CHARS {
        return Err(ExtractError::AmbiguousSource);
    }

    if len == 0 {
        return Err(ExtractError::EmptyInput);
    }
    if len < MIN_INPUT_CHARS {
        return Err(ExtractError::TooShort { len });
    }

    Ok(Route::Paste(trimmed.to_string()))
}
