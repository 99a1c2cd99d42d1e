//! Object-store access seams.
//!
//! The cache talks to its durable store through two deliberately separate
//! paths. The single-key path backs `lookup`/`put`, which run while a
//! request is being served and need minimal latency. The bulk path backs
//! invalidation and enumeration, which tolerate higher latency in exchange
//! for prefix listing and multi-key deletes the hot path lacks.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::metadata::{CustomMetadata, HttpMetadata};

/// Protocol limit: keys returned per listing page.
pub const MAX_KEYS_PER_PAGE: usize = 1000;

/// Protocol limit: keys accepted by one batched delete call. Larger sets
/// must be chunked by the caller.
pub const MAX_KEYS_PER_DELETE: usize = 1000;

/// What the store recorded about a written object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    pub key: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Content fingerprint assigned by the store.
    pub etag: String,
    /// When the stored content was written.
    pub uploaded_at: DateTime<Utc>,
}

/// A cache entry read back from the object store.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub body: Bytes,
    pub descriptor: ObjectDescriptor,
    pub http_metadata: HttpMetadata,
    pub custom_metadata: CustomMetadata,
}

/// Metadata supplied alongside a write.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub http_metadata: HttpMetadata,
    pub custom_metadata: CustomMetadata,
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Token for the next page; `None` means the listing is exhausted.
    pub continuation: Option<String>,
}

/// Low-latency single-key store access (hot path).
#[async_trait]
pub trait SingleObjectStore: Send + Sync {
    /// Fetch the entry stored under `key`. Absence is `Ok(None)`, never an
    /// error.
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, StoreError>;

    /// Store or overwrite the entry under `key`. Concurrent writes to the
    /// same key resolve to last-writer-wins at the store; there is no
    /// contention handling above that.
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<ObjectDescriptor, StoreError>;
}

/// Paginated listing and batched deletion (cold path).
#[async_trait]
pub trait BulkObjectStore: Send + Sync {
    /// Fetch one page of keys, optionally scoped to `prefix`. A fresh
    /// listing starts with `continuation = None`; each call establishes
    /// its own cursor, so a listing is finite but not restartable.
    async fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<String>,
    ) -> Result<ListPage, StoreError>;

    /// Delete up to [`MAX_KEYS_PER_DELETE`] keys, returning the subset
    /// that actually existed and was removed.
    async fn delete_batch(&self, keys: &[String]) -> Result<Vec<String>, StoreError>;
}
