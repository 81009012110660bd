//! Fixed-window request quota per caller identity.
//!
//! Counters live in one map and are all cleared together when the wall
//! clock crosses a window boundary. For a one-hour window that is the top of
//! every hour (UTC), regardless of when the server started.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::auth::Identity;

#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per window
    limit: u32,
    window: Duration,
    counts: Mutex<HashMap<String, u32>>,
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed {
        /// Requests left in the current window
        remaining: u32,
        limit: u32,
    },
    Exceeded {
        /// Time until the counters are cleared
        retry_after: Duration,
        limit: u32,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    /// `X-RateLimit-*` and `Retry-After` header pairs for a response.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            RateLimitResult::Allowed { remaining, limit } => vec![
                ("X-RateLimit-Limit", limit.to_string()),
                ("X-RateLimit-Remaining", remaining.to_string()),
            ],
            RateLimitResult::Exceeded { retry_after, limit } => vec![
                ("X-RateLimit-Limit", limit.to_string()),
                ("X-RateLimit-Remaining", "0".to_string()),
                ("Retry-After", whole_seconds(*retry_after).to_string()),
            ],
        }
    }
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window: window.max(Duration::from_secs(1)), counts: Mutex::new(HashMap::new()) }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Counts one request for `identity`.
    ///
    /// Rejected requests are not counted.
    pub async fn check(&self, identity: &Identity) -> RateLimitResult {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(identity.as_str().to_string()).or_insert(0);

        if *count >= self.limit {
            debug!(identity = identity.as_str(), limit = self.limit, "rate limit exceeded");
            return RateLimitResult::Exceeded { retry_after: self.until_reset(), limit: self.limit };
        }

        *count += 1;
        RateLimitResult::Allowed { remaining: self.limit - *count, limit: self.limit }
    }

    /// Current count for `identity`.
    pub async fn count(&self, identity: &Identity) -> u32 {
        self.counts.lock().await.get(identity.as_str()).copied().unwrap_or(0)
    }

    /// Clears every counter.
    pub async fn reset(&self) {
        let mut counts = self.counts.lock().await;
        let callers = counts.len();
        counts.clear();
        info!(callers, "rate limit counters reset");
    }

    /// Time left until the next window boundary.
    pub fn until_reset(&self) -> Duration {
        let now = OffsetDateTime::now_utc();
        (next_boundary(now, self.window) - now).unsigned_abs()
    }
}

/// Seconds rounded up, never below one.
fn whole_seconds(duration: Duration) -> u64 {
    (duration.as_secs() + u64::from(duration.subsec_nanos() > 0)).max(1)
}

/// First multiple of `window` (counted from the Unix epoch) after `now`.
pub fn next_boundary(now: OffsetDateTime, window: Duration) -> OffsetDateTime {
    let secs = window.as_secs().max(1) as i64;
    let next = (now.unix_timestamp().div_euclid(secs) + 1) * secs;
    OffsetDateTime::from_unix_timestamp(next).unwrap_or(now + window)
}

/// Spawns a task that clears `limiter` at every window boundary.
pub fn spawn_reset_task(limiter: Arc<RateLimiter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(limiter.until_reset()).await;
            limiter.reset().await;
        }
    })
}
