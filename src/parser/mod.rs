pub mod dispatch;
pub mod extract;
pub mod lines;
pub mod markup;
pub mod normalize;
pub mod sections;

use std::future::Future;

use tracing::debug;

use crate::error::Result;
use crate::model::Post;
use dispatch::Route;

/// Plaintext pipeline: normalize → sections → meta/body/comments → finalize.
pub fn extract_text(raw: &str, source: &str) -> Post {
    let text = normalize::normalize(raw);
    let data = extract::extract_all(&text);
    debug!(
        comments = data.comments.len(),
        mode = ?data.mode,
        "extracted pasted text"
    );
    Post::finalize(data.meta, source, &data.body, data.comments)
}

/// Parse a fetched article page.
pub fn extract_markup(html: &str, source: &str) -> Result<Post> {
    markup::extract(html, source)
}

/// Single entry point: route `input` by shape, fetching locators through `fetch`.
///
/// `fetch` gets the resolved article URL and returns the page markup, or
/// `FetchUnavailable` when every path failed.
pub async fn extract<F, Fut>(input: &str, fetch: F) -> Result<Post>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    match dispatch::route(input)? {
        Route::Locator(url) => {
            let html = fetch(url.clone()).await?;
            extract_markup(&html, &url)
        }
        Route::Paste(text) => Ok(extract_text(&text, crate::model::PASTED_SOURCE)),
    }
}

// ── Tests ──
