use std::sync::LazyLock;

use serde::Serialize;

use crate::Document;
use crate::selector::{MatchMode, Selector};

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::tag("meta").with_attr("property", MatchMode::Equals, "og:title"));

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::tag("title"));

static META_AUTHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::tag("meta").with_attr("name", MatchMode::Equals, "author"));

/// Byline locations, tried one selector at a time in this order.
static AUTHOR_SELECTORS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        Selector::any().with_class("author"),
        Selector::any().with_class("byline"),
        Selector::any().with_attr("rel", MatchMode::Equals, "author"),
    ]
});

/// Title and author of a document. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub author: String,
}

impl Document {
    /// Extract title with priority fallback:
    /// 1. Open Graph `og:title`
    /// 2. `<title>` element
    ///
    /// The first non-blank value wins. Returns an empty string when neither
    /// source has text.
    pub fn extract_title(&self) -> String {
        if let Some(title) = self.first_meta_content(&OG_TITLE) {
            return title;
        }

        if let Some(el) = self.select_first(&TITLE) {
            let text = el.text();
            let text = text.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }

        String::new()
    }

    /// Extract author with priority fallback:
    /// 1. Meta `author`
    /// 2. First `.author` element
    /// 3. First `.byline` element
    /// 4. First `[rel=author]` element
    ///
    /// Only the first element of each selector is looked at; when its text is
    /// blank the next selector is tried.
    pub fn extract_author(&self) -> String {
        if let Some(author) = self.first_meta_content(&META_AUTHOR) {
            return author;
        }

        for selector in AUTHOR_SELECTORS.iter() {
            if let Some(el) = self.select_first(selector) {
                let text = el.text();
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }

        String::new()
    }

    /// Extract title and author together.
    pub fn extract_metadata(&self) -> Metadata {
        Metadata { title: self.extract_title(), author: self.extract_author() }
    }

    /// Trimmed `content` attribute of the first element matching `selector`.
    fn first_meta_content(&self, selector: &Selector) -> Option<String> {
        let content = self.select_first(selector)?.attr("content")?.trim();
        (!content.is_empty()).then(|| content.to_string())
    }
}
