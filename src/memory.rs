//! In-memory object store.
//!
//! Implements both store seams over a concurrent map. Serves local
//! development and tests, and doubles as the reference for what a real
//! R2/S3-backed implementation must honor: last-writer-wins puts,
//! `Ok(None)` on absent keys, 1000-key listing pages with continuation
//! tokens, and the 1000-key delete limit enforced at the callee too.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::store::{
    BulkObjectStore, ListPage, MAX_KEYS_PER_DELETE, MAX_KEYS_PER_PAGE, ObjectDescriptor,
    ObjectMetadata, SingleObjectStore, StoredEntry,
};

#[derive(Clone)]
struct StoredObject {
    body: Bytes,
    metadata: ObjectMetadata,
    descriptor: ObjectDescriptor,
}

/// Concurrent in-memory object store.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, StoredObject>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn sorted_keys(&self, prefix: Option<&str>) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| prefix.is_none_or(|p| key.starts_with(p)))
            .collect();
        keys.sort();
        keys
    }
}

fn fingerprint(body: &Bytes) -> String {
    hex::encode(Sha256::digest(body))
}

#[async_trait]
impl SingleObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, StoreError> {
        Ok(self.objects.get(key).map(|object| StoredEntry {
            body: object.body.clone(),
            descriptor: object.descriptor.clone(),
            http_metadata: object.metadata.http_metadata.clone(),
            custom_metadata: object.metadata.custom_metadata.clone(),
        }))
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<ObjectDescriptor, StoreError> {
        let descriptor = ObjectDescriptor {
            key: key.to_string(),
            size: body.len() as u64,
            etag: fingerprint(&body),
            uploaded_at: Utc::now(),
        };
        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                metadata,
                descriptor: descriptor.clone(),
            },
        );
        Ok(descriptor)
    }
}

#[async_trait]
impl BulkObjectStore for MemoryObjectStore {
    async fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<String>,
    ) -> Result<ListPage, StoreError> {
        // The continuation token is the last key of the previous page;
        // the next page starts strictly after it.
        let keys = self.sorted_keys(prefix);
        let start = match &continuation {
            Some(token) => keys.partition_point(|key| key.as_str() <= token.as_str()),
            None => 0,
        };
        let page: Vec<String> = keys[start..]
            .iter()
            .take(MAX_KEYS_PER_PAGE)
            .cloned()
            .collect();
        let continuation = if start + page.len() < keys.len() {
            page.last().cloned()
        } else {
            None
        };
        Ok(ListPage {
            keys: page,
            continuation,
        })
    }

    async fn delete_batch(&self, keys: &[String]) -> Result<Vec<String>, StoreError> {
        if keys.len() > MAX_KEYS_PER_DELETE {
            return Err(StoreError::BatchTooLarge {
                got: keys.len(),
                limit: MAX_KEYS_PER_DELETE,
            });
        }
        let deleted = keys
            .iter()
            .filter(|key| self.objects.remove(key.as_str()).is_some())
            .cloned()
            .collect();
        Ok(deleted)
    }
}
