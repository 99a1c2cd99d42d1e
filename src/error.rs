//! Error types for cache, store, and purge operations.

use thiserror::Error;

use crate::keys::CacheKey;

/// Errors surfaced by object-store implementations.
///
/// Store failures are propagated unmodified to the caller of the invoking
/// cache operation; no layer in this crate retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("batch of {got} keys exceeds the {limit}-key delete limit")]
    BatchTooLarge { got: usize, limit: usize },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Errors surfaced by the edge purge client.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("purge request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("purge endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid purge URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Top-level errors returned by [`RouteCache`](crate::RouteCache) operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cache key could be derived from the given input. Raised before
    /// any I/O is attempted; an empty string is never a valid key.
    #[error("no cache key derivable from request input")]
    InvalidKey,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Purge(#[from] PurgeError),
    /// Some delete chunks succeeded while another failed. `deleted` names
    /// the keys already removed from the origin store. No edge purge was
    /// issued, so the edge may keep serving those keys until their TTL
    /// expires.
    #[error("partial delete: {} keys removed before a chunk failed: {source}", deleted.len())]
    PartialDelete {
        deleted: Vec<CacheKey>,
        source: StoreError,
    },
}
