//! API key checks.
//!
//! Keys are kept only as SHA-256 digests and every lookup compares the
//! presented digest against all stored ones in constant time.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Identity given to callers that present no key.
pub const ANONYMOUS: &str = "anon";

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid api key")]
    InvalidKey,

    #[error("missing api key")]
    MissingKey,
}

/// The caller a request is accounted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn anonymous() -> Self {
        Self(ANONYMOUS.to_string())
    }

    fn for_digest(digest: &[u8; 32]) -> Self {
        let prefix: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
        Self(format!("key-{}", prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS
    }
}

/// The set of accepted API keys.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    digests: Vec<[u8; 32]>,
    allow_anonymous: bool,
}

impl KeyRegistry {
    pub fn new<I, S>(keys: I, allow_anonymous: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let digests = keys.into_iter().map(|key| digest(key.as_ref())).collect();
        Self { digests, allow_anonymous }
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Resolves a presented key to an identity.
    ///
    /// A missing or blank key is anonymous when that is allowed.
    pub fn authenticate(&self, key: Option<&str>) -> Result<Identity, AuthError> {
        let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
            return if self.allow_anonymous { Ok(Identity::anonymous()) } else { Err(AuthError::MissingKey) };
        };

        let presented = digest(key);
        let found = self.digests.iter().fold(false, |found, stored| found | constant_time_eq(stored, &presented));

        if found { Ok(Identity::for_digest(&presented)) } else { Err(AuthError::InvalidKey) }
    }
}

fn digest(key: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(key.as_bytes()));
    out
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
