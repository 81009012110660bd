use crate::article::Article;

/// Renders the article body as plain text with a trailing newline.
///
/// The body is already normalized, so this only terminates the last line.
pub fn convert_to_text(article: &Article) -> String {
    let mut output = String::with_capacity(article.content.len() + 1);
    output.push_str(&article.content);
    output.push('\n');
    output
}
