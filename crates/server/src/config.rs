//! Server configuration from `PLAINPAGE_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use plainpage_core::FetchConfig;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_API_KEY: &str = "demo-key-123";
pub const DEFAULT_RATE_LIMIT: u32 = 100;
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 3600;

/// Extra time allowed on top of the fetch timeout before a request is cut off.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Accepted API keys in plain text. Hashed once at startup.
    pub api_keys: Vec<String>,
    /// Requests without a key are served under the `anon` identity.
    pub allow_anonymous: bool,
    /// Requests per identity per window.
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub fetch: FetchConfig,
    /// Directory served under `/static`, if any.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_keys: vec![DEFAULT_API_KEY.to_string()],
            allow_anonymous: true,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window: Duration::from_secs(DEFAULT_RATE_WINDOW_SECS),
            fetch: FetchConfig::default(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("PLAINPAGE_ADDR") {
            config.addr = parse("PLAINPAGE_ADDR", &addr)?;
        }

        if let Some(keys) = get("PLAINPAGE_API_KEYS") {
            config.api_keys = keys.split(',').map(str::trim).filter(|k| !k.is_empty()).map(String::from).collect();
            if config.api_keys.is_empty() {
                return Err(ConfigError::Empty("PLAINPAGE_API_KEYS"));
            }
        }

        if let Some(flag) = get("PLAINPAGE_ALLOW_ANONYMOUS") {
            config.allow_anonymous = parse_bool("PLAINPAGE_ALLOW_ANONYMOUS", &flag)?;
        }

        if let Some(limit) = get("PLAINPAGE_RATE_LIMIT") {
            config.rate_limit = parse("PLAINPAGE_RATE_LIMIT", &limit)?;
        }

        if let Some(secs) = get("PLAINPAGE_RATE_WINDOW_SECS") {
            let secs: u64 = parse("PLAINPAGE_RATE_WINDOW_SECS", &secs)?;
            if secs == 0 {
                return Err(invalid("PLAINPAGE_RATE_WINDOW_SECS", "0", "must be at least 1"));
            }
            config.rate_window = Duration::from_secs(secs);
        }

        if let Some(secs) = get("PLAINPAGE_FETCH_TIMEOUT") {
            config.fetch.timeout = parse("PLAINPAGE_FETCH_TIMEOUT", &secs)?;
        }

        if let Some(bytes) = get("PLAINPAGE_MAX_BYTES") {
            config.fetch.max_bytes = parse("PLAINPAGE_MAX_BYTES", &bytes)?;
        }

        if let Some(agent) = get("PLAINPAGE_USER_AGENT") {
            config.fetch.user_agent = agent;
        }

        config.static_dir = get("PLAINPAGE_STATIC_DIR").map(PathBuf::from);

        Ok(config)
    }

    /// Upper bound on the time spent handling one request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout) + REQUEST_TIMEOUT_SLACK
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid { var, value: value.to_string(), reason: reason.to_string() }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| invalid(var, value, e))
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}
