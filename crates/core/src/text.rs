//! Text gathering and whitespace normalization.
//!
//! Body text is read from paragraph and top-level heading elements only;
//! everything else (lists, tables, captions, navigation) is ignored.

use std::collections::HashSet;

use crate::parse::{Document, Element};

/// Tags whose text counts as body text.
pub const TEXT_BLOCK_TAGS: &[&str] = &["p", "h1", "h2", "h3"];

/// Separator placed between gathered blocks.
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Gathers block text below a set of root elements.
///
/// Every `p`/`h1`/`h2`/`h3` strictly below any root is visited once, in
/// document order across the roots, even when roots nest. Each block's text is
/// trimmed, blank blocks are dropped, and the rest are joined with a blank
/// line.
///
/// # Example
///
/// ```rust
/// use plainpage_core::{Document, Selector, text::gather_text};
///
/// let doc = Document::parse("<article><h1> Title </h1><p></p><p>Body <em>text</em></p></article>");
/// let article = Selector::tag("article");
/// assert_eq!(gather_text(doc.select(&article)), "Title\n\nBody text");
/// ```
pub fn gather_text<'a>(roots: impl IntoIterator<Item = Element<'a>>) -> String {
    let mut seen = HashSet::new();
    let blocks = roots
        .into_iter()
        .flat_map(Element::descendant_elements)
        .filter(is_text_block)
        .filter(move |el| seen.insert(el.node_id()));
    join_blocks(blocks)
}

/// Gathers block text from the whole document.
pub fn gather_document_text(doc: &Document) -> String {
    join_blocks(doc.elements().filter(is_text_block))
}

/// Normalizes gathered text.
///
/// Carriage returns are removed, the ends are trimmed, and any run of three
/// or more newlines becomes exactly two. The result is a fixed point:
/// `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut out = text.replace('\r', "").trim().to_string();
    while out.contains("\n\n\n") {
        out = out.replace("\n\n\n", "\n\n");
    }
    out
}

fn is_text_block(element: &Element<'_>) -> bool {
    TEXT_BLOCK_TAGS.contains(&element.tag_name())
}

fn join_blocks<'a>(blocks: impl Iterator<Item = Element<'a>>) -> String {
    blocks
        .filter_map(|el| {
            let text = el.text();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect::<Vec<_>>()
        .join(PARAGRAPH_BREAK)
}
