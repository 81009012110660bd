//! Error types for plainpage operations.
//!
//! This module defines the main error type [`Error`] which represents all
//! failures of the extraction engine and of the fetch collaborator that feeds
//! it. The extraction engine itself only ever produces two of them:
//! [`Error::ParseFailed`] and [`Error::NoContentDetected`].
//!
//! # Example
//!
//! ```rust
//! use plainpage_core::{Error, ErrorKind, extract_str};
//!
//! match extract_str("<html><body><nav><a>Home</a></nav></body></html>") {
//!     Ok(article) => println!("{}", article.content),
//!     Err(err) => assert_eq!(err.kind(), ErrorKind::NoContentDetected),
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Main error type for extraction and fetching.
#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes could not be interpreted as a node tree.
    ///
    /// Raised for binary payloads (images, PDFs, archives) that were handed to
    /// the engine in place of markup. Not retriable.
    #[error("Failed to parse HTML: {0}")]
    ParseFailed(String),

    /// The document parsed, but no heuristic tier found any body text.
    ///
    /// This typically means the page is a navigation shell, a search page, or
    /// a layout that does not follow common CMS conventions.
    #[error("No article content detected")]
    NoContentDetected,

    /// A selector string outside the supported CSS subset.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The upstream server answered with an error status.
    #[error("Bad upstream status: {status}")]
    UpstreamStatus { status: u16 },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File and stdin I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering errors.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Field-less discriminant of [`Error`], used at serialization boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ParseFailed,
    NoContentDetected,
    InvalidSelector,
    InvalidUrl,
    Http,
    Timeout,
    UpstreamStatus,
    FileNotFound,
    Io,
    Serialize,
}

impl ErrorKind {
    /// The snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseFailed => "parse_failed",
            ErrorKind::NoContentDetected => "no_content_detected",
            ErrorKind::InvalidSelector => "invalid_selector",
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::Http => "http",
            ErrorKind::Timeout => "timeout",
            ErrorKind::UpstreamStatus => "upstream_status",
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::Io => "io",
            ErrorKind::Serialize => "serialize",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ParseFailed(_) => ErrorKind::ParseFailed,
            Error::NoContentDetected => ErrorKind::NoContentDetected,
            Error::InvalidSelector(_) => ErrorKind::InvalidSelector,
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            #[cfg(feature = "fetch")]
            Error::Http(_) => ErrorKind::Http,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            Error::FileNotFound(_) => ErrorKind::FileNotFound,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialize(_) => ErrorKind::Serialize,
        }
    }

    /// Whether the failure came from the page itself rather than from getting it.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, Error::ParseFailed(_) | Error::NoContentDetected)
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
