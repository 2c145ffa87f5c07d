use serde::Serialize;

pub const UNTITLED: &str = "無標題";
pub const UNKNOWN: &str = "未知";
/// `source` value for posts that came from pasted text rather than a fetch.
pub const PASTED_SOURCE: &str = "Text Import / Gmail";

pub const MAX_BODY_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Push,
    Boo,
    Arrow,
}

impl Reaction {
    pub const ALL: [Reaction; 3] = [Reaction::Push, Reaction::Boo, Reaction::Arrow];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "推" => Some(Reaction::Push),
            "噓" => Some(Reaction::Boo),
            "→" => Some(Reaction::Arrow),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Reaction::Push => "推",
            Reaction::Boo => "噓",
            Reaction::Arrow => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: String,
    pub reaction: Reaction,
    pub user: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub push: usize,
    pub boo: usize,
    pub arrow: usize,
    pub total: usize,
}

impl Stats {
    pub fn tally(comments: &[Comment]) -> Self {
        let mut stats = Stats {
            total: comments.len(),
            ..Default::default()
        };
        for c in comments {
            match c.reaction {
                Reaction::Push => stats.push += 1,
                Reaction::Boo => stats.boo += 1,
                Reaction::Arrow => stats.arrow += 1,
            }
        }
        stats
    }

    pub fn count(&self, reaction: Reaction) -> usize {
        match reaction {
            Reaction::Push => self.push,
            Reaction::Boo => self.boo,
            Reaction::Arrow => self.arrow,
        }
    }
}

/// Header fields of a post, already defaulted to the sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub title: String,
    pub author: String,
    pub date: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: UNTITLED.to_string(),
            author: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
        }
    }
}

/// One extracted article. Built whole by [`Post::finalize`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    title: String,
    author: String,
    date: String,
    source: String,
    body: String,
    comments: Vec<Comment>,
    stats: Stats,
}

impl Post {
    /// Caps the body at [`MAX_BODY_CHARS`] and derives `stats` from `comments`.
    pub fn finalize(meta: Meta, source: impl Into<String>, body: &str, comments: Vec<Comment>) -> Self {
        let stats = Stats::tally(&comments);
        Self {
            title: meta.title,
            author: meta.author,
            date: meta.date,
            source: source.into(),
            body: truncate_chars(body, MAX_BODY_CHARS),
            comments,
            stats,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
