//! Content fetching from URLs, files, and stdin.
//!
//! Every source yields raw bytes; decoding is left to
//! [`Document::from_bytes`](crate::Document::from_bytes) so that binary
//! payloads are rejected in one place.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::debug;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{Error, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Default cap on the number of body bytes read from a response.
pub const DEFAULT_MAX_BYTES: usize = 5_000_000;

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Bodies longer than this are truncated, not rejected.
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: "plainpage/1.0 (+https://github.com/plainpage/plainpage)".to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Turns user input into an absolute http(s) URL.
///
/// Input that does not start with `http` gets `http://` prepended, so
/// `example.com/post` becomes `http://example.com/post`.
#[cfg(feature = "fetch")]
pub fn normalize_url(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidUrl("URL is empty".to_string()));
    }

    let candidate = if input.starts_with("http") { input.to_string() } else { format!("http://{}", input) };
    let url = Url::parse(&candidate).map_err(|e| Error::InvalidUrl(format!("{}: {}", input, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!("unsupported scheme '{}' in {}", scheme, input))),
    }
}

/// Fetches a page body.
///
/// Redirects are followed. A final status of 400 or above is reported as
/// [`Error::UpstreamStatus`]. The body is read chunk by chunk and cut off at
/// `config.max_bytes`.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<Vec<u8>> {
    let url = normalize_url(url)?;
    let timeout = config.timeout;
    let on_error = |e: reqwest::Error| if e.is_timeout() { Error::Timeout { timeout } } else { Error::Http(e) };

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout))
        .user_agent(&config.user_agent)
        .build()?;

    debug!(url = %url, "fetching page");
    let mut response = client
        .get(url.clone())
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(on_error)?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(Error::UpstreamStatus { status: status.as_u16() });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(on_error)? {
        let room = config.max_bytes - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!(url = %url, max_bytes = config.max_bytes, "body truncated");
            break;
        }
        body.extend_from_slice(&chunk);
    }

    debug!(url = %url, status = status.as_u16(), bytes = body.len(), "fetched page");
    Ok(body)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<Vec<u8>> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() { Err(Error::FileNotFound(path_buf)) } else { Ok(fs::read(&path_buf)?) }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "fetch")]
    use httpmock::prelude::*;
    use std::io::Write;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 10);
        assert_eq!(config.max_bytes, 5_000_000);
        assert!(config.user_agent.starts_with("plainpage/"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_normalize_url_prepends_scheme() {
        assert_eq!(normalize_url("example.com/post").unwrap().as_str(), "http://example.com/post");
        assert_eq!(normalize_url("https://example.com/").unwrap().as_str(), "https://example.com/");
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_normalize_url_rejects_bad_input() {
        assert!(matches!(normalize_url(""), Err(Error::InvalidUrl(_))));
        assert!(matches!(normalize_url("   "), Err(Error::InvalidUrl(_))));
        assert!(matches!(normalize_url("httpx://example.com"), Err(Error::InvalidUrl(_))));
        assert!(matches!(normalize_url("http://"), Err(Error::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_returns_body_and_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/post").header("user-agent", "test-agent");
            then.status(200).header("content-type", "text/html").body("<p>hello</p>");
        });

        let config = FetchConfig { user_agent: "test-agent".into(), ..Default::default() };
        let body = fetch_url(&server.url("/post"), &config).await.unwrap();

        mock.assert();
        assert_eq!(body, b"<p>hello</p>");
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let result = fetch_url(&server.url("/missing"), &FetchConfig::default()).await;
        assert!(matches!(result, Err(Error::UpstreamStatus { status: 404 })));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_truncates_at_max_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/big");
            then.status(200).body("x".repeat(10_000));
        });

        let config = FetchConfig { max_bytes: 1_000, ..Default::default() };
        let body = fetch_url(&server.url("/big"), &config).await.unwrap();
        assert_eq!(body.len(), 1_000);
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_without_scheme() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bare");
            then.status(200).body("ok");
        });

        let bare = format!("{}/bare", server.address());
        assert_eq!(fetch_url(&bare, &FetchConfig::default()).await.unwrap(), b"ok");
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<p>file</p>").unwrap();
        let body = fetch_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(body, b"<p>file</p>");
    }
}
