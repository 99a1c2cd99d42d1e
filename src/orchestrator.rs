//! Cache orchestrator.
//!
//! Composes key resolution, the metadata codec, the two object-store
//! paths, and the edge purge client into the cache API. Holds no cache
//! state of its own: configuration and client handles only, so every
//! call is independently dispatchable and safe to run concurrently.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CacheConfig;
use crate::edge::{EdgePurge, HttpPurgeClient};
use crate::error::{CacheError, PurgeError, StoreError};
use crate::keys::{CacheKey, KeyInput};
use crate::metadata::{CustomMetadata, HttpMetadata};
use crate::response::CachedResponse;
use crate::store::{
    BulkObjectStore, MAX_KEYS_PER_DELETE, ObjectDescriptor, ObjectMetadata, SingleObjectStore,
};

struct EdgeHandle {
    /// Joined with deleted keys to form absolute purge URLs.
    origin: Url,
    client: Arc<dyn EdgePurge>,
}

/// Pull-style HTTP response cache over an object store, with edge purge
/// propagation.
///
/// `lookup` and `put` run on the low-latency single-key path; the
/// invalidation and enumeration operations run on the bulk path.
/// Concurrent `put`s to the same key resolve to last-writer-wins at the
/// store; cache entries are idempotent recomputations of the same
/// resource, so no locking is layered on top. No operation retries or
/// imposes a deadline; callers wrap a timeout around a call if they need
/// one.
pub struct RouteCache {
    config: CacheConfig,
    single: Arc<dyn SingleObjectStore>,
    bulk: Arc<dyn BulkObjectStore>,
    edge: Option<EdgeHandle>,
}

impl RouteCache {
    /// Build a cache over the given store handles.
    ///
    /// When the configuration carries an edge section, an
    /// [`HttpPurgeClient`] is constructed for it; otherwise every purge
    /// call is a no-op and the cache runs as a pure origin-store cache.
    pub fn new(
        config: CacheConfig,
        single: Arc<dyn SingleObjectStore>,
        bulk: Arc<dyn BulkObjectStore>,
    ) -> Result<Self, CacheError> {
        let edge = match &config.edge {
            Some(edge_config) => Some(EdgeHandle {
                origin: Url::parse(&edge_config.origin).map_err(PurgeError::Url)?,
                client: Arc::new(HttpPurgeClient::new(edge_config)?),
            }),
            None => None,
        };
        Ok(Self {
            config,
            single,
            bulk,
            edge,
        })
    }

    /// Build a cache with a caller-supplied purge client (tests,
    /// alternative edge APIs). `origin` is joined with deleted keys to
    /// form absolute purge URLs; `config.edge` is not consulted.
    pub fn with_purge_client(
        config: CacheConfig,
        single: Arc<dyn SingleObjectStore>,
        bulk: Arc<dyn BulkObjectStore>,
        origin: Url,
        client: Arc<dyn EdgePurge>,
    ) -> Self {
        Self {
            config,
            single,
            bulk,
            edge: Some(EdgeHandle { origin, client }),
        }
    }

    /// Look up a previously stored response.
    ///
    /// A miss is `Ok(None)`, never an error. On a hit the response is
    /// rehydrated from the stored entry; see
    /// [`CachedResponse::from_entry`] for the computed headers and status
    /// defaulting.
    pub async fn lookup(&self, request: &KeyInput) -> Result<Option<CachedResponse>, CacheError> {
        let key = request.resolve()?;
        let Some(entry) = self.single.get(key.as_str()).await? else {
            debug!(key = %key, "cache miss");
            return Ok(None);
        };
        debug!(key = %key, size = entry.descriptor.size, "cache hit");
        Ok(Some(CachedResponse::from_entry(entry)))
    }

    /// Store a response for future lookups, overwriting any previous
    /// entry under the same key.
    ///
    /// The response body must already be fully materialized; the store
    /// needs a complete, length-known payload. The persisted metadata is
    /// the codec subset of the response headers plus the status line
    /// copied verbatim.
    pub async fn put(
        &self,
        request: &KeyInput,
        response: &CachedResponse,
    ) -> Result<ObjectDescriptor, CacheError> {
        let key = request.resolve()?;
        let metadata = ObjectMetadata {
            http_metadata: HttpMetadata::from_headers(
                response
                    .headers
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            ),
            custom_metadata: CustomMetadata {
                status_code: Some(response.status.to_string()),
                status_text: Some(response.status_text.clone()),
            },
        };
        let descriptor = self
            .single
            .put(key.as_str(), response.body.clone(), metadata)
            .await?;
        debug!(key = %key, size = descriptor.size, "stored cache entry");
        Ok(descriptor)
    }

    /// Invalidate a single entry. Equivalent to
    /// [`RouteCache::delete_many`] with one request.
    pub async fn delete(&self, request: &KeyInput) -> Result<Vec<CacheKey>, CacheError> {
        self.delete_many(std::slice::from_ref(request)).await
    }

    /// Invalidate a set of entries, returning the keys actually deleted.
    ///
    /// All keys are resolved up front (any unresolvable request fails the
    /// whole call before I/O). The keys are partitioned into chunks of at
    /// most [`MAX_KEYS_PER_DELETE`], all chunk deletes run concurrently,
    /// and only after every chunk has completed is the edge purge issued
    /// for the deleted keys. Purging first would let the edge re-pull a
    /// stale entry from an origin store that still held it.
    pub async fn delete_many(&self, requests: &[KeyInput]) -> Result<Vec<CacheKey>, CacheError> {
        let keys = requests
            .iter()
            .map(KeyInput::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        let deleted = self.delete_chunked(&keys).await?;
        info!(
            bucket = %self.config.bucket,
            requested = keys.len(),
            deleted = deleted.len(),
            "invalidated cache entries"
        );
        self.purge_deleted(&deleted).await?;
        Ok(deleted)
    }

    /// Invalidate every entry in the bucket, returning the deleted keys.
    ///
    /// Enumerates the whole bucket, deletes in chunks exactly like
    /// [`RouteCache::delete_many`], then purges the entire edge zone.
    /// Last-resort operation: a zone purge invalidates every path at the
    /// edge, so the next request for each one recomputes at the origin.
    /// An empty bucket issues no delete calls but still purges the zone
    /// when an edge is configured.
    pub async fn delete_all(&self) -> Result<Vec<CacheKey>, CacheError> {
        let keys = self.collect_keys(None).await?;
        let deleted = if keys.is_empty() {
            Vec::new()
        } else {
            self.delete_chunked(&keys).await?
        };
        info!(
            bucket = %self.config.bucket,
            deleted = deleted.len(),
            "invalidated entire cache"
        );
        if let Some(edge) = &self.edge {
            edge.client.purge_all().await.map_err(CacheError::Purge)?;
        } else {
            debug!("no edge configured, skipping zone purge");
        }
        Ok(deleted)
    }

    /// Enumerate stored keys, optionally scoped to the prefix derived
    /// from `request`, draining all listing pages.
    pub async fn keys(&self, request: Option<&KeyInput>) -> Result<Vec<CacheKey>, CacheError> {
        let prefix = request.map(KeyInput::resolve).transpose()?;
        self.collect_keys(prefix.as_ref().map(CacheKey::as_str))
            .await
    }

    async fn collect_keys(&self, prefix: Option<&str>) -> Result<Vec<CacheKey>, CacheError> {
        let mut keys = Vec::new();
        let mut continuation = None;
        loop {
            let page = self.bulk.list_page(prefix, continuation).await?;
            keys.extend(page.keys.into_iter().map(CacheKey::new));
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }
        Ok(keys)
    }

    /// Delete `keys` in chunks of at most [`MAX_KEYS_PER_DELETE`], running
    /// all chunk calls concurrently and collecting every chunk's outcome
    /// before deciding. A failed chunk never cancels the others; keys the
    /// other chunks removed are reported through
    /// [`CacheError::PartialDelete`] rather than discarded.
    async fn delete_chunked(&self, keys: &[CacheKey]) -> Result<Vec<CacheKey>, CacheError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let chunks: Vec<Vec<String>> = keys
            .chunks(MAX_KEYS_PER_DELETE)
            .map(|chunk| chunk.iter().map(|key| key.as_str().to_string()).collect())
            .collect();
        let outcomes = join_all(chunks.iter().map(|chunk| self.bulk.delete_batch(chunk))).await;

        let mut deleted = Vec::new();
        let mut failure: Option<StoreError> = None;
        for outcome in outcomes {
            match outcome {
                Ok(chunk_deleted) => deleted.extend(chunk_deleted.into_iter().map(CacheKey::new)),
                Err(err) => {
                    if failure.is_none() {
                        failure = Some(err);
                    } else {
                        warn!(error = %err, "additional delete chunk failed");
                    }
                }
            }
        }
        match failure {
            None => Ok(deleted),
            Some(source) => Err(CacheError::PartialDelete { deleted, source }),
        }
    }

    /// Purge the edge copies of `deleted`. Runs strictly after every
    /// chunk delete has completed, so an edge miss always reaches an
    /// origin that has already forgotten the entry. A purge failure here
    /// is terminal: the origin deletions are not rolled back, and stale
    /// edge copies expire via their own TTL.
    async fn purge_deleted(&self, deleted: &[CacheKey]) -> Result<(), CacheError> {
        let Some(edge) = &self.edge else {
            debug!("no edge configured, skipping purge");
            return Ok(());
        };
        if deleted.is_empty() {
            debug!("nothing deleted, skipping purge");
            return Ok(());
        }
        let urls = deleted
            .iter()
            .map(|key| edge.origin.join(key.as_str()).map_err(PurgeError::Url))
            .collect::<Result<Vec<_>, _>>()?;
        edge.client.purge_urls(&urls).await.map_err(CacheError::Purge)?;
        Ok(())
    }
}
