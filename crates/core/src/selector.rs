//! A small CSS-like selector engine.
//!
//! A [`Selector`] is an optional tag name plus a list of attribute
//! predicates, all of which must hold. Selectors can be built in code or
//! parsed from a compound CSS subset:
//!
//! | syntax          | meaning                                               |
//! |-----------------|-------------------------------------------------------|
//! | `tag` / `*`     | tag name equals `tag` / any tag                       |
//! | `.name`         | `class` has `name` as one of its whitespace tokens    |
//! | `#name`         | `id` equals `name`                                    |
//! | `[attr]`        | `attr` is present                                     |
//! | `[attr=v]`      | `attr` equals `v`                                     |
//! | `[attr*=v]`     | `attr` contains the substring `v`                     |
//! | `[attr~=v]`     | `attr` has `v` as one of its whitespace tokens        |
//!
//! Combinators and selector lists are not supported.
//!
//! # Known limitation
//!
//! `*=` is a raw, case-sensitive substring test on the literal attribute
//! value. `[class*=content]` therefore also matches `class="noncontent"`.
//! The body heuristics depend on this loose matching to pick up ad-hoc CMS
//! class names, so it is kept as is.

use std::fmt;
use std::str::FromStr;

use crate::parse::Element;
use crate::{Error, Result};

/// How an attribute predicate compares against the attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The attribute exists, whatever its value.
    Present,
    /// Exact equality.
    Equals,
    /// Case-sensitive substring of the raw value.
    Contains,
    /// One of the whitespace-separated tokens of the value.
    Word,
}

/// A single `(attribute, mode, value)` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPredicate {
    pub name: String,
    pub mode: MatchMode,
    pub value: String,
}

impl AttrPredicate {
    /// Tests this predicate against `element`'s attributes.
    pub fn holds(&self, element: &Element<'_>) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };

        match self.mode {
            MatchMode::Present => true,
            MatchMode::Equals => actual == self.value,
            MatchMode::Contains => !self.value.is_empty() && actual.contains(self.value.as_str()),
            MatchMode::Word => !self.value.is_empty() && actual.split_whitespace().any(|word| word == self.value),
        }
    }
}

/// An immutable element selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    predicates: Vec<AttrPredicate>,
}

impl Selector {
    /// Matches every element.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches elements with the given tag name.
    pub fn tag(name: &str) -> Self {
        Self { tag: Some(name.to_ascii_lowercase()), predicates: Vec::new() }
    }

    /// Adds an attribute predicate.
    pub fn with_attr(mut self, name: &str, mode: MatchMode, value: &str) -> Self {
        self.predicates.push(AttrPredicate { name: name.to_string(), mode, value: value.to_string() });
        self
    }

    /// Adds a `.class` predicate.
    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", MatchMode::Word, class)
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn predicates(&self) -> &[AttrPredicate] {
        &self.predicates
    }

    /// Whether `element` satisfies the tag test and every predicate.
    pub fn matches(&self, element: &Element<'_>) -> bool {
        if let Some(tag) = &self.tag
            && element.tag_name() != tag.as_str()
        {
            return false;
        }
        self.predicates.iter().all(|predicate| predicate.holds(element))
    }

    /// Parses a compound selector such as `meta[property="og:title"]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] for empty input and for anything
    /// outside the supported subset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use plainpage_core::selector::{MatchMode, Selector};
    ///
    /// let sel = Selector::parse("div[class*=content]").unwrap();
    /// assert_eq!(sel.tag_name(), Some("div"));
    /// assert_eq!(sel.predicates()[0].mode, MatchMode::Contains);
    /// assert!(Selector::parse("div > p").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        Parser { src: input.trim(), pos: 0 }.selector()
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if self.predicates.is_empty() => f.write_str("*")?,
            None => {}
        }

        for p in &self.predicates {
            match (p.name.as_str(), p.mode) {
                ("class", MatchMode::Word) => write!(f, ".{}", p.value)?,
                ("id", MatchMode::Equals) => write!(f, "#{}", p.value)?,
                (name, MatchMode::Present) => write!(f, "[{}]", name)?,
                (name, MatchMode::Equals) => write!(f, "[{}=\"{}\"]", name, p.value)?,
                (name, MatchMode::Contains) => write!(f, "[{}*=\"{}\"]", name, p.value)?,
                (name, MatchMode::Word) => write!(f, "[{}~=\"{}\"]", name, p.value)?,
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn selector(mut self) -> Result<Selector> {
        if self.src.is_empty() {
            return Err(self.error("empty selector"));
        }

        let mut selector = if self.eat('*') {
            Selector::any()
        } else {
            match self.ident() {
                "" => Selector::any(),
                tag => Selector::tag(tag),
            }
        };

        while let Some(c) = self.bump() {
            selector = match c {
                '.' => selector.with_class(self.required_ident()?),
                '#' => {
                    let id = self.required_ident()?;
                    selector.with_attr("id", MatchMode::Equals, id)
                }
                '[' => {
                    let predicate = self.attribute()?;
                    selector.predicates.push(predicate);
                    selector
                }
                other => return Err(self.error(&format!("unsupported syntax '{}'", other))),
            };
        }

        if selector.tag.is_none() && selector.predicates.is_empty() && self.src != "*" {
            return Err(self.error("nothing to match"));
        }
        Ok(selector)
    }

    /// Parses the inside of `[...]`; the opening bracket is already consumed.
    fn attribute(&mut self) -> Result<AttrPredicate> {
        self.skip_whitespace();
        let name = self.required_ident()?.to_string();
        self.skip_whitespace();

        let mode = match self.bump() {
            Some(']') => return Ok(AttrPredicate { name, mode: MatchMode::Present, value: String::new() }),
            Some('=') => MatchMode::Equals,
            Some('*') if self.eat('=') => MatchMode::Contains,
            Some('~') if self.eat('=') => MatchMode::Word,
            _ => return Err(self.error("expected '=', '*=', '~=' or ']'")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                let len = self.rest().find(quote).ok_or_else(|| self.error("unterminated string"))?;
                self.pos += len + 1;
                &self.src[start..start + len]
            }
            _ => {
                let len = self.rest().find(']').ok_or_else(|| self.error("missing ']'"))?;
                let value = self.src[self.pos..self.pos + len].trim_end();
                self.pos += len;
                value
            }
        };

        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error("missing ']'"));
        }
        Ok(AttrPredicate { name, mode, value: value.to_string() })
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn ident(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn required_ident(&mut self) -> Result<&'a str> {
        match self.ident() {
            "" => Err(self.error("expected a name")),
            ident => Ok(ident),
        }
    }

    fn error(&self, reason: &str) -> Error {
        Error::InvalidSelector(format!("{} in {:?} at offset {}", reason, self.src, self.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use rstest::rstest;

    fn ids(doc: &Document, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector).filter_map(|el| el.attr("data-n")).map(str::to_string).collect()
    }

    const PAGE: &str = r#"
        <html><head>
            <meta data-n="m1" property="og:title" content="Hi">
            <meta data-n="m2" name="author" content="Ann">
        </head><body>
            <div data-n="d1" id="main-content" class="post featured">
                <p data-n="p1" class="byline">By Ann</p>
                <a data-n="a1" rel="author" href="/ann">Ann</a>
            </div>
            <div data-n="d2" class="noncontent"><p data-n="p2">aside</p></div>
            <section data-n="s1" class="entry-content"></section>
        </body></html>
    "#;

    #[rstest]
    #[case("div", &["d1", "d2"])]
    #[case("DIV", &["d1", "d2"])]
    #[case(".post", &["d1"])]
    #[case("div.featured.post", &["d1"])]
    #[case("#main-content", &["d1"])]
    #[case("[id*=content]", &["d1"])]
    #[case("[class*=content]", &["d2", "s1"])]
    #[case(".entry-content", &["s1"])]
    #[case("[rel=author]", &["a1"])]
    #[case("meta[property='og:title']", &["m1"])]
    #[case(r#"meta[name="author"]"#, &["m2"])]
    #[case("[ class ~= byline ]", &["p1"])]
    #[case("a[href]", &["a1"])]
    #[case(".content", &[])]
    #[case("[id=content]", &[])]
    fn test_select(#[case] selector: &str, #[case] expected: &[&str]) {
        let doc = Document::parse(PAGE);
        assert_eq!(ids(&doc, selector), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("div > p")]
    #[case("p, h1")]
    #[case(".")]
    #[case("[class^=x]")]
    #[case("[class='x]")]
    #[case("[class=x")]
    fn test_invalid_selectors(#[case] selector: &str) {
        assert!(matches!(Selector::parse(selector), Err(Error::InvalidSelector(_))));
    }

    #[test]
    fn test_substring_match_is_not_token_aware() {
        let doc = Document::parse(r#"<div class="noncontent"><p>x</p></div>"#);
        let selector = Selector::any().with_attr("class", MatchMode::Contains, "content");
        assert_eq!(doc.select(&selector).count(), 1);
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        let doc = Document::parse(r#"<div class="MainContent"><p>x</p></div>"#);
        let selector = Selector::parse("[class*=content]").unwrap();
        assert_eq!(doc.select(&selector).count(), 0);
    }

    #[test]
    fn test_universal_selector() {
        let sel = Selector::parse("*").unwrap();
        assert_eq!(sel, Selector::any());
        assert_eq!(sel.to_string(), "*");
    }

    #[test]
    fn test_display_round_trips() {
        for source in ["article", ".post", "#main", "[rel=\"author\"]", "div[class*=\"content\"]", "a[href]"] {
            let sel = Selector::parse(source).unwrap();
            assert_eq!(Selector::parse(&sel.to_string()).unwrap(), sel);
        }
    }
}
