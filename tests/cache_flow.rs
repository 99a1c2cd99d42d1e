//! Hot-path flow: put and lookup against the in-memory object store.

use std::sync::Arc;

use bytes::Bytes;
use brezza::{
    CDN_CACHE_CONTROL, CacheConfig, CachedResponse, KeyInput, MemoryObjectStore, RouteCache,
};

fn cache_over(store: Arc<MemoryObjectStore>) -> RouteCache {
    RouteCache::new(CacheConfig::default(), store.clone(), store).expect("cache builds")
}

fn html_response(status: u16, status_text: &str, body: &'static str) -> CachedResponse {
    CachedResponse {
        status,
        status_text: status_text.to_string(),
        headers: vec![("content-type".to_string(), "text/html".to_string())],
        body: Bytes::from_static(body.as_bytes()),
    }
}

#[tokio::test]
async fn put_then_lookup_reconstructs_the_response() {
    let cache = cache_over(Arc::new(MemoryObjectStore::new()));
    let request = KeyInput::from("/blog/post-1");

    let descriptor = cache
        .put(&request, &html_response(200, "OK", "hello"))
        .await
        .expect("put succeeds");
    assert_eq!(descriptor.size, 5);

    let hit = cache
        .lookup(&request)
        .await
        .expect("lookup succeeds")
        .expect("cache hit");
    assert_eq!(hit.status, 200);
    assert_eq!(hit.body, Bytes::from_static(b"hello"));
    assert_eq!(hit.header("Content-Type"), Some("text/html"));
    assert_eq!(hit.header("ETag"), Some(descriptor.etag.as_str()));
    assert_eq!(hit.header("Content-Length"), Some("5"));
    assert!(hit.header("Last-Modified").is_some());
    assert_eq!(hit.header("CDN-Cache-Control"), Some(CDN_CACHE_CONTROL));
}

#[tokio::test]
async fn stored_status_line_survives_the_round_trip() {
    let cache = cache_over(Arc::new(MemoryObjectStore::new()));
    let request = KeyInput::from("/blog/gone");

    cache
        .put(&request, &html_response(404, "Not Found", "missing page"))
        .await
        .expect("put succeeds");

    let hit = cache
        .lookup(&request)
        .await
        .expect("lookup succeeds")
        .expect("cache hit");
    assert_eq!(hit.status, 404);
    assert_eq!(hit.status_text, "Not Found");
}

#[tokio::test]
async fn entry_is_retrievable_iff_last_operation_was_a_put() {
    let cache = cache_over(Arc::new(MemoryObjectStore::new()));
    let request = KeyInput::from("/docs/guide");

    assert!(cache.lookup(&request).await.expect("lookup").is_none());

    cache
        .put(&request, &html_response(200, "OK", "v1"))
        .await
        .expect("put succeeds");
    assert!(cache.lookup(&request).await.expect("lookup").is_some());

    let deleted = cache.delete(&request).await.expect("delete succeeds");
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].as_str(), "/docs/guide");
    assert!(cache.lookup(&request).await.expect("lookup").is_none());
}

#[tokio::test]
async fn overwrite_serves_the_latest_body() {
    let cache = cache_over(Arc::new(MemoryObjectStore::new()));
    let request = KeyInput::from("/home");

    cache
        .put(&request, &html_response(200, "OK", "first"))
        .await
        .expect("first put");
    cache
        .put(&request, &html_response(200, "OK", "second"))
        .await
        .expect("second put");

    let hit = cache
        .lookup(&request)
        .await
        .expect("lookup succeeds")
        .expect("cache hit");
    assert_eq!(hit.body, Bytes::from_static(b"second"));
}

#[tokio::test]
async fn requests_differing_only_in_query_share_an_entry() {
    let cache = cache_over(Arc::new(MemoryObjectStore::new()));
    let first = url::Url::parse("https://example.com/posts?page=1").expect("valid url");
    let second = url::Url::parse("https://example.com/posts?page=2").expect("valid url");

    cache
        .put(&KeyInput::Url(first), &html_response(200, "OK", "listing"))
        .await
        .expect("put succeeds");

    let hit = cache
        .lookup(&KeyInput::Url(second))
        .await
        .expect("lookup succeeds");
    assert!(hit.is_some());
}

#[tokio::test]
async fn keys_enumerates_stored_entries_under_a_prefix() {
    let cache = cache_over(Arc::new(MemoryObjectStore::new()));
    for path in ["/blog/a", "/blog/b", "/docs/a"] {
        cache
            .put(&KeyInput::from(path), &html_response(200, "OK", "x"))
            .await
            .expect("put succeeds");
    }

    let all = cache.keys(None).await.expect("keys succeeds");
    assert_eq!(all.len(), 3);

    let scoped = cache
        .keys(Some(&KeyInput::from("/blog/")))
        .await
        .expect("keys succeeds");
    let scoped: Vec<&str> = scoped.iter().map(|key| key.as_str()).collect();
    assert_eq!(scoped, vec!["/blog/a", "/blog/b"]);
}
