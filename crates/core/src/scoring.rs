//! Body candidate scoring.
//!
//! The article body is located with a greedy, three-tier heuristic:
//!
//! 1. A fixed, ordered list of structural selectors (semantic tags and common
//!    CMS class/id names). Each selector's full match set is one candidate,
//!    scored by the trimmed length of its gathered text. The longest wins and
//!    ties go to the selector listed first.
//! 2. When no candidate has text, every `div` is scored on its own and the
//!    longest wins, ties going to the first in document order.
//! 3. When no `div` has text either, all block text in the document is used.
//!
//! There is no link-density or tag-density weighting; length is the only
//! signal.

use std::fmt;
use std::sync::LazyLock;

use tracing::debug;

use crate::parse::{Document, Element};
use crate::selector::{MatchMode, Selector};
use crate::text::{gather_document_text, gather_text};

/// Structural body selectors in priority order.
pub static CANDIDATE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    vec![
        Selector::tag("article"),
        Selector::tag("main"),
        Selector::any().with_attr("id", MatchMode::Contains, "content"),
        Selector::any().with_attr("class", MatchMode::Contains, "content"),
        Selector::any().with_class("post"),
        Selector::any().with_class("entry-content"),
        Selector::any().with_class("article-body"),
        Selector::any().with_class("post-body"),
    ]
});

static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::tag("div"));

/// One scored attempt at locating the body.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// The selector that produced the match set.
    pub selector: &'a Selector,
    /// The matched elements, in document order.
    pub elements: Vec<Element<'a>>,
    /// Gathered, un-normalized text.
    pub text: String,
    /// Byte length of the trimmed text.
    pub length: usize,
}

impl<'a> Candidate<'a> {
    fn new(selector: &'a Selector, elements: Vec<Element<'a>>) -> Self {
        let text = gather_text(elements.iter().copied());
        let length = text.trim().len();
        Self { selector, elements, text, length }
    }
}

/// Which tier produced the body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyTier {
    /// A structural selector, rendered as CSS.
    Candidate(String),
    /// The single longest `div`.
    LargestDiv,
    /// All block text in the document.
    Document,
}

impl fmt::Display for BodyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyTier::Candidate(selector) => write!(f, "candidate {}", selector),
            BodyTier::LargestDiv => f.write_str("largest div"),
            BodyTier::Document => f.write_str("whole document"),
        }
    }
}

/// The chosen body text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySelection {
    pub text: String,
    pub tier: BodyTier,
}

/// Evaluates every structural selector that matches at least one element.
///
/// Candidates are returned in priority order, including those whose text is
/// empty.
pub fn score_candidates(doc: &Document) -> Vec<Candidate<'_>> {
    CANDIDATE_SELECTORS
        .iter()
        .filter_map(|selector| {
            let elements: Vec<_> = doc.select(selector).collect();
            if elements.is_empty() {
                return None;
            }
            let candidate = Candidate::new(selector, elements);
            debug!(
                selector = %selector,
                matches = candidate.elements.len(),
                length = candidate.length,
                "scored body candidate"
            );
            Some(candidate)
        })
        .collect()
}

/// Runs the three tiers and reports which one produced the text.
pub fn choose_body(doc: &Document) -> BodySelection {
    if let Some(best) = longest(score_candidates(doc)) {
        return BodySelection { tier: BodyTier::Candidate(best.selector.to_string()), text: best.text };
    }

    let divs = doc.select(&DIV).map(|div| Candidate::new(&DIV, vec![div]));
    if let Some(best) = longest(divs) {
        return BodySelection { tier: BodyTier::LargestDiv, text: best.text };
    }

    BodySelection { tier: BodyTier::Document, text: gather_document_text(doc) }
}

/// Returns the raw (un-normalized) body text of `doc`.
///
/// # Example
///
/// ```rust
/// use plainpage_core::{Document, scoring::select_body};
///
/// let doc = Document::parse("<main><p>Body</p></main><div><p>Much longer sidebar text</p></div>");
/// assert_eq!(select_body(&doc), "Body");
/// ```
pub fn select_body(doc: &Document) -> String {
    choose_body(doc).text
}

/// The first candidate with the strictly greatest non-zero length.
fn longest<'a>(candidates: impl IntoIterator<Item = Candidate<'a>>) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;
    for candidate in candidates {
        let best_len = best.as_ref().map_or(0, |b| b.length);
        if candidate.length > best_len {
            best = Some(candidate);
        }
    }
    best
}
