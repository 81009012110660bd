pub mod json;
pub mod markdown;
pub mod text;

pub use json::{JsonConfig, convert_to_json, metadata_to_json};
pub use markdown::{MarkdownConfig, convert_to_markdown};
pub use text::convert_to_text;
