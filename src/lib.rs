//! Brezza — pull-style HTTP response cache over a durable object store,
//! with invalidations propagated to an edge cache.
//!
//! A caller checks the cache before recomputing an expensive response
//! (server-rendered routes, typically); on a miss it computes the
//! response and stores it for future hits. Invalidation deletes from the
//! origin store first and only then purges the edge, so an edge miss
//! always reaches an origin that has already forgotten the entry.
//!
//! ## Layout
//!
//! - [`KeyInput`]/[`CacheKey`]: canonical key derivation from request-like
//!   inputs (pathname only; query and host are ignored).
//! - [`HttpMetadata`]/[`CustomMetadata`]: codec between HTTP headers and
//!   the metadata fields an object store can persist.
//! - [`SingleObjectStore`]/[`BulkObjectStore`]: the two store access
//!   paths — low-latency single-key for serving, paginated listing and
//!   batched deletes for invalidation. [`MemoryObjectStore`] implements
//!   both for local use and tests.
//! - [`EdgePurge`]/[`HttpPurgeClient`]: purge-by-URL and purge-everything
//!   against the edge zone's control API.
//! - [`RouteCache`]: the orchestrator composing all of the above.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use brezza::{CacheConfig, KeyInput, MemoryObjectStore, RouteCache};
//!
//! # async fn demo() -> Result<(), brezza::CacheError> {
//! let store = Arc::new(MemoryObjectStore::new());
//! let cache = RouteCache::new(CacheConfig::default(), store.clone(), store)?;
//!
//! let request = KeyInput::from("/blog/post-1");
//! if let Some(hit) = cache.lookup(&request).await? {
//!     // serve `hit`
//! } else {
//!     // compute the response, then `cache.put(&request, &response).await?`
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The crate emits [`tracing`] events and never installs a subscriber;
//! consumers wire up their own.

mod config;
mod edge;
mod error;
mod keys;
mod memory;
mod metadata;
mod orchestrator;
mod response;
mod store;

pub use config::{CacheConfig, EdgeConfig};
pub use edge::{EdgePurge, HttpPurgeClient};
pub use error::{CacheError, PurgeError, StoreError};
pub use keys::{CacheKey, KeyInput};
pub use memory::MemoryObjectStore;
pub use metadata::{CustomMetadata, HttpMetadata, format_http_date, parse_http_date};
pub use orchestrator::RouteCache;
pub use response::{CDN_CACHE_CONTROL, CachedResponse};
pub use store::{
    BulkObjectStore, ListPage, MAX_KEYS_PER_DELETE, MAX_KEYS_PER_PAGE, ObjectDescriptor,
    ObjectMetadata, SingleObjectStore, StoredEntry,
};
