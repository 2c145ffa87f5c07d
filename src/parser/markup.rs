//! Extraction from fetched PTT web pages.
//!
//! The web view marks every field with a class, so nothing here needs the
//! plaintext patterns except the re-route for pages that lost `#main-content`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::model::{Comment, Meta, Post, Reaction};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static OVER18: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#".over18-notice, input[name="yes"]"#).unwrap());
static MAIN_CONTENT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#main-content").unwrap());
static METALINE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".article-metaline").unwrap());
static META_TAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".article-meta-tag").unwrap());
static META_VALUE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".article-meta-value").unwrap());
static PUSH: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".push").unwrap());
static PUSH_TAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".push-tag").unwrap());
static PUSH_USER: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".push-userid").unwrap());
static PUSH_CONTENT: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".push-content").unwrap());
static PUSH_TIME: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".push-ipdatetime").unwrap());

/// Subtrees of `#main-content` that are not part of the article body.
const NON_BODY_CLASSES: &[&str] = &["article-metaline", "article-metaline-right", "push"];

/// Whether a fetched payload is worth handing to [`extract`]: an article, the
/// age gate, or a not-found page.
pub fn looks_like_post_page(html: &str) -> bool {
    html.contains("main-content") || html.contains("over18-notice") || html.contains("404")
}

pub fn extract(html: &str, source: &str) -> Result<Post> {
    let doc = Html::parse_document(html);

    if is_not_found(&doc) {
        return Err(ExtractError::NotFound);
    }
    if doc.select(&OVER18).next().is_some() {
        return Err(ExtractError::AgeRestricted);
    }

    let Some(main) = doc.select(&MAIN_CONTENT).next() else {
        let text = body_text(&doc);
        if text.contains("作者") || text.contains("推") {
            debug!(source, "no #main-content, re-routing page text through plaintext parser");
            return Ok(super::extract_text(&text, source));
        }
        return Err(ExtractError::MalformedStructure);
    };

    let meta = extract_meta(&doc);
    let comments = extract_comments(&doc);
    let body = article_text(main);

    Ok(Post::finalize(meta, source, &body, comments))
}

fn is_not_found(doc: &Html) -> bool {
    let title_404 = doc
        .select(&TITLE)
        .next()
        .is_some_and(|t| t.text().collect::<String>().contains("404"));
    title_404 || body_text(doc).contains("404 Not Found")
}

fn body_text(doc: &Html) -> String {
    match doc.select(&BODY).next() {
        Some(body) => body.text().collect(),
        None => doc.root_element().text().collect(),
    }
}

fn extract_meta(doc: &Html) -> Meta {
    let mut meta = Meta::default();

    for line in doc.select(&METALINE) {
        let tag = first_text(line, &META_TAG);
        let Some(value) = first_text(line, &META_VALUE).filter(|v| !v.is_empty()) else {
            continue;
        };
        match tag.as_deref() {
            Some("作者") => meta.author = value,
            Some("標題") => meta.title = value,
            Some("時間") => meta.date = value,
            _ => {}
        }
    }

    meta
}

fn extract_comments(doc: &Html) -> Vec<Comment> {
    let mut comments = Vec::new();

    for (index, push) in doc.select(&PUSH).enumerate() {
        let tag = first_text(push, &PUSH_TAG).unwrap_or_default();
        let Some(reaction) = Reaction::from_tag(tag.trim()) else {
            debug!(index, tag = %tag, "skipping push node with unknown tag");
            continue;
        };
        let user = first_text(push, &PUSH_USER).map(|u| u.trim().to_string()).unwrap_or_default();
        if user.is_empty() {
            debug!(index, "skipping push node without user id");
            continue;
        }
        let content = first_text(push, &PUSH_CONTENT)
            .map(|c| {
                let c = c.trim_start();
                c.strip_prefix(':').unwrap_or(c).trim().to_string()
            })
            .unwrap_or_default();
        let timestamp = first_text(push, &PUSH_TIME)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        comments.push(Comment {
            id: format!("c-{}", comments.len()),
            reaction,
            user,
            content,
            timestamp,
        });
    }

    comments
}

fn first_text(el: ElementRef, selector: &Selector) -> Option<String> {
    el.select(selector).next().map(|e| e.text().collect())
}

/// Text of `#main-content` without the header lines and push nodes.
fn article_text(main: ElementRef) -> String {
    let mut out = String::new();

    for node in main.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let inside_excluded = node
            .ancestors()
            .take_while(|a| a.id() != main.id())
            .filter_map(|a| a.value().as_element())
            .any(|el| el.classes().any(|c| NON_BODY_CLASSES.contains(&c)));
        if !inside_excluded {
            out.push_str(text);
        }
    }

    out.trim().to_string()
}
