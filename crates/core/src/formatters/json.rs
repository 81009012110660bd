use serde::Serialize;

use crate::Result;
use crate::article::Article;
use crate::metadata::Metadata;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output with two-space indentation
    pub pretty: bool,
    /// Add `word_count` and `reading_time` to the object
    pub include_metrics: bool,
}

/// An article plus its derived metrics.
#[derive(Debug, Clone, Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    article: &'a Article,
    word_count: usize,
    reading_time: f64,
}

fn to_string<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(json)
}

/// Convert an article to JSON.
///
/// Without metrics the shape is `{"title", "author", "content"}` with
/// `author` omitted when empty.
pub fn convert_to_json(article: &Article, config: &JsonConfig) -> Result<String> {
    if config.include_metrics {
        let output = JsonOutput { article, word_count: article.word_count(), reading_time: article.reading_time() };
        to_string(&output, config.pretty)
    } else {
        to_string(article, config.pretty)
    }
}

/// Convert metadata to JSON (for --metadata-only flag)
pub fn metadata_to_json(metadata: &Metadata, pretty: bool) -> Result<String> {
    to_string(metadata, pretty)
}
