//! Article output type and format conversion.
//!
//! This module defines the [`Article`] struct which is the successful result
//! of extraction: a title, an author and the normalized body text.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Result;
use crate::formatters::{JsonConfig, MarkdownConfig, convert_to_json, convert_to_markdown, convert_to_text};

/// Reading speed used for [`Article::reading_time`].
pub const WORDS_PER_MINUTE: f64 = 200.0;

/// Output format options for Article content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The body text as extracted.
    #[default]
    Text,
    /// Markdown with the title as a heading and a byline.
    Markdown,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, markdown, json", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        })
    }
}

/// A clean article.
///
/// `content` is never blank: extraction reports
/// [`Error::NoContentDetected`](crate::Error::NoContentDetected) instead of
/// producing an empty article. `title` and `author` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Page title, possibly empty.
    pub title: String,

    /// Byline, possibly empty. Omitted from JSON when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,

    /// Normalized body text, paragraphs separated by a blank line.
    pub content: String,
}

impl Article {
    pub fn new(title: String, author: String, content: String) -> Self {
        Self { title, author, content }
    }

    /// Number of words in the body.
    pub fn word_count(&self) -> usize {
        count_words(&self.content)
    }

    /// Estimated reading time in minutes.
    pub fn reading_time(&self) -> f64 {
        self.word_count() as f64 / WORDS_PER_MINUTE
    }

    /// Number of paragraphs in the body.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split("\n\n").filter(|p| !p.trim().is_empty())
    }

    /// Converts the article to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(convert_to_text(self)),
            OutputFormat::Markdown => Ok(convert_to_markdown(self, &MarkdownConfig::default())),
            OutputFormat::Json => convert_to_json(self, &JsonConfig { pretty: true, ..Default::default() }),
        }
    }

    /// Gets the article as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Counts whitespace-separated words that contain at least one letter or digit.
fn count_words(text: &str) -> usize {
    text.split_whitespace().filter(|w| w.chars().any(char::is_alphanumeric)).count()
}
