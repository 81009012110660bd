//! Extraction entry points.
//!
//! [`extract`] turns raw page bytes into an [`Article`]. It is synchronous and
//! deterministic: the same bytes always produce the same article or the same
//! error.

use tracing::debug;

use crate::article::Article;
use crate::parse::Document;
use crate::scoring::choose_body;
use crate::text::normalize;
use crate::{Error, Result};

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_url};

/// Extracts a clean article from raw page bytes.
///
/// # Errors
///
/// - [`Error::ParseFailed`] when the bytes are not markup at all.
/// - [`Error::NoContentDetected`] when no body text was found.
///
/// # Example
///
/// ```rust
/// use plainpage_core::extract;
///
/// let html = b"<html><head><title>Hi</title></head>\
///     <body><article><p>Hello world.</p><p>Second paragraph.</p></article></body></html>";
/// let article = extract(html).unwrap();
/// assert_eq!(article.title, "Hi");
/// assert_eq!(article.content, "Hello world.\n\nSecond paragraph.");
/// ```
pub fn extract(bytes: &[u8]) -> Result<Article> {
    let doc = Document::from_bytes(bytes)?;
    extract_document(&doc)
}

/// Extracts a clean article from an HTML string.
pub fn extract_str(html: &str) -> Result<Article> {
    extract_document(&Document::parse(html))
}

/// Extracts a clean article from an already parsed document.
pub fn extract_document(doc: &Document) -> Result<Article> {
    let title = doc.extract_title();
    let author = doc.extract_author();

    let body = choose_body(doc);
    let content = normalize(&body.text);
    debug!(tier = %body.tier, length = content.len(), "selected body");

    if content.is_empty() {
        return Err(Error::NoContentDetected);
    }

    Ok(Article::new(title, author, content))
}

/// Fetches a page and extracts it.
///
/// The document is parsed only after the body has been fully read, so no
/// parse state is held across an await point.
#[cfg(feature = "fetch")]
pub async fn fetch_and_extract(url: &str, config: &FetchConfig) -> Result<Article> {
    let bytes = fetch_url(url, config).await?;
    extract(&bytes)
}
