pub mod body;
pub mod comments;
pub mod meta;

use super::sections::cluster_sections;
use crate::model::{Comment, Meta};
use comments::ScanMode;

pub struct ExtractedText {
    pub meta: Meta,
    pub body: String,
    pub comments: Vec<Comment>,
    pub mode: ScanMode,
}

/// Run meta, body and comment extraction over already normalized text.
pub fn extract_all(text: &str) -> ExtractedText {
    let sections = cluster_sections(text);
    let meta = meta::extract(text);
    let body = body::extract(text, &sections);
    let (comments, mode) = comments::extract(text);

    ExtractedText {
        meta,
        body,
        comments,
        mode,
    }
}

// ── Tests ──
