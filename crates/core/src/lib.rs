pub mod article;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod metadata;
pub mod parse;
pub mod scoring;
pub mod selector;
pub mod text;
pub mod traverse;

pub use article::{Article, OutputFormat};
pub use error::{Error, ErrorKind, Result};
#[cfg(feature = "fetch")]
pub use extract::fetch_and_extract;
pub use extract::{extract, extract_document, extract_str};
pub use fetch::{FetchConfig, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_url, normalize_url};
pub use formatters::{JsonConfig, MarkdownConfig};
pub use formatters::{convert_to_json, convert_to_markdown, convert_to_text, metadata_to_json};
pub use metadata::Metadata;
pub use parse::{Document, Element, Node};
#[doc(hidden)]
pub use scoring::{BodySelection, BodyTier, Candidate, choose_body, score_candidates};
pub use scoring::select_body;
pub use selector::{AttrPredicate, MatchMode, Selector};
pub use text::{gather_text, normalize};
