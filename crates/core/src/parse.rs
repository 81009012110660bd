//! HTML parsing and the read-only node model.
//!
//! This module provides the [`Document`], [`Element`] and [`Node`] types that
//! every extraction stage works against. Parsing is delegated to `scraper`
//! (html5ever); walking the tree goes through [`crate::traverse`].
//!
//! # Example
//!
//! ```rust
//! use plainpage_core::{Document, Selector};
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let selector: Selector = "p.content".parse().unwrap();
//! assert_eq!(doc.select(&selector).count(), 1);
//! ```

use ego_tree::{NodeId, NodeRef};
use scraper::node::Node as RawNode;
use scraper::{ElementRef, Html};

use crate::selector::Selector;
use crate::traverse::Descendants;
use crate::{Error, Result};

/// Represents a parsed HTML document.
///
/// A Document is created once per input and never mutated afterwards.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from any malformed markup, so this cannot fail.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses HTML from raw response bytes.
    ///
    /// Valid UTF-8 is parsed as-is and other text is decoded lossily.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseFailed`] when the bytes are binary data (invalid
    /// UTF-8 containing NUL bytes) rather than markup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::parse(text)),
            Err(_) if bytes.contains(&0) => Err(Error::ParseFailed("input is binary data, not markup".to_string())),
            Err(_) => Ok(Self::parse(&String::from_utf8_lossy(bytes))),
        }
    }

    /// Every node of the document in document order, the document node first.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + Clone {
        Descendants::including(self.html.tree.root()).filter_map(Node::from_raw)
    }

    /// Every element of the document in document order.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> + Clone {
        Descendants::including(self.html.tree.root()).filter_map(Element::from_raw)
    }

    /// Lazily yields the elements matching `selector`, in document order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use plainpage_core::{Document, Selector};
    ///
    /// let doc = Document::parse(r#"<p class="a">First</p><p class="a">Second</p>"#);
    /// let matches: Vec<_> = doc.select(&Selector::parse("p.a").unwrap()).collect();
    /// assert_eq!(matches.len(), 2);
    /// assert_eq!(matches[1].text(), "Second");
    /// ```
    pub fn select<'a, 's>(&'a self, selector: &'s Selector) -> impl Iterator<Item = Element<'a>> + 's
    where
        'a: 's,
    {
        self.elements().filter(move |el| selector.matches(el))
    }

    /// The first element matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<Element<'_>> {
        self.select(selector).next()
    }

    /// Concatenation of every text node in the document.
    pub fn text_content(&self) -> String {
        collect_text(Descendants::including(self.html.tree.root()))
    }
}

/// A single node of a [`Document`].
///
/// Comments, doctypes and processing instructions are not surfaced.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// The document (or fragment) root.
    Document,
    /// A tagged element with attributes and ordered children.
    Element(Element<'a>),
    /// A text leaf.
    Text(&'a str),
}

impl<'a> Node<'a> {
    fn from_raw(node: NodeRef<'a, RawNode>) -> Option<Self> {
        match node.value() {
            RawNode::Document | RawNode::Fragment => Some(Node::Document),
            RawNode::Element(_) => Element::from_raw(node).map(Node::Element),
            RawNode::Text(text) => Some(Node::Text(&**text)),
            _ => None,
        }
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element<'a>> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The text content, if this node is a text leaf.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Node::Text(text) => Some(*text),
            _ => None,
        }
    }
}

/// A borrowed element of a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn from_raw(node: NodeRef<'a, RawNode>) -> Option<Self> {
        ElementRef::wrap(node).map(|element| Self { element })
    }

    /// Identity of this element within its document.
    pub fn node_id(&self) -> NodeId {
        self.element.id()
    }

    /// Gets the tag name of this element.
    ///
    /// html5ever lowercases HTML tag names while parsing.
    pub fn tag_name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Gets the value of an attribute, `None` when absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// All attributes as `(name, value)` pairs.
    pub fn attrs(self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.element.value().attrs()
    }

    /// Direct children in order.
    pub fn children(self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.element.children().filter_map(Node::from_raw)
    }

    /// Every element below this one (not including itself), in document order.
    pub fn descendant_elements(self) -> impl Iterator<Item = Element<'a>> + Clone + 'a {
        Descendants::below(*self.element).filter_map(Element::from_raw)
    }

    /// Elements below this one matching `selector`.
    pub fn select<'s>(self, selector: &'s Selector) -> impl Iterator<Item = Element<'a>> + 's
    where
        'a: 's,
    {
        self.descendant_elements().filter(move |el| selector.matches(el))
    }

    /// Concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        collect_text(Descendants::below(*self.element))
    }
}

fn collect_text(nodes: Descendants<'_>) -> String {
    nodes.filter_map(|node| node.value().as_text().map(|text| &**text)).collect()
}
