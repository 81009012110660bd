use crate::article::Article;

/// Configuration for Markdown output
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include title as H1 heading at the start of content
    pub include_title: bool,
    /// Include an italic byline under the title
    pub include_author: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_title: true, include_author: true }
    }
}

/// Convert an article to Markdown.
///
/// Empty titles and authors are skipped even when enabled. Paragraphs are
/// already separated by blank lines, which is what Markdown expects.
pub fn convert_to_markdown(article: &Article, config: &MarkdownConfig) -> String {
    let mut output = String::new();

    if config.include_title && !article.title.is_empty() {
        output.push_str(&format!("# {}\n\n", article.title));
    }

    if config.include_author && !article.author.is_empty() {
        output.push_str(&format!("*By {}*\n\n", article.author));
    }

    output.push_str(&article.content);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article::new("Hi".into(), "Ann".into(), "Hello world.\n\nSecond paragraph.".into())
    }

    #[test]
    fn test_convert_to_markdown_full() {
        let md = convert_to_markdown(&article(), &MarkdownConfig::default());
        assert_eq!(md, "# Hi\n\n*By Ann*\n\nHello world.\n\nSecond paragraph.\n");
    }

    #[test]
    fn test_convert_to_markdown_skips_empty_fields() {
        let article = Article::new(String::new(), String::new(), "Body".into());
        assert_eq!(convert_to_markdown(&article, &MarkdownConfig::default()), "Body\n");
    }

    #[test]
    fn test_convert_to_markdown_without_title() {
        let config = MarkdownConfig { include_title: false, ..Default::default() };
        let md = convert_to_markdown(&article(), &config);
        assert!(md.starts_with("*By Ann*"));
        assert!(!md.contains("# Hi"));
    }
}
