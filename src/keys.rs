//! Cache key derivation.
//!
//! A cache entry is identified by the pathname of the route that produced
//! it. Two requests that differ only in query string or host map to the
//! same key.

use std::fmt;

use url::Url;

use crate::error::CacheError;

/// Canonical cache key: the URL pathname identifying a cached route.
///
/// Always non-empty and stable across calls for the same logical resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wrap a key that is already in canonical form (store listings,
    /// resolved inputs). Callers must not pass an empty string.
    pub(crate) fn new(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recognized key-derivation inputs.
///
/// Each cache operation accepts one of these shapes and derives the key
/// through [`KeyInput::resolve`]; resolution failure is reported as
/// [`CacheError::InvalidKey`] before any I/O happens.
#[derive(Debug, Clone)]
pub enum KeyInput {
    /// A parsed URL; the key is its path, query and host are ignored.
    Url(Url),
    /// An already-resolved key string, passed through unchanged.
    Raw(String),
    /// A request identified by its target URL.
    Request { url: Url },
}

impl KeyInput {
    /// Derive the canonical cache key for this input.
    pub fn resolve(&self) -> Result<CacheKey, CacheError> {
        let key = match self {
            Self::Url(url) | Self::Request { url } => url.path().to_string(),
            Self::Raw(raw) => raw.clone(),
        };
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }
        Ok(CacheKey::new(key))
    }
}

impl From<Url> for KeyInput {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<&str> for KeyInput {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for KeyInput {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}
