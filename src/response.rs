//! Cached HTTP responses.
//!
//! The same shape flows both ways: callers hand a materialized response to
//! `put`, and `lookup` rehydrates one from a stored entry.

use bytes::Bytes;

use crate::metadata::format_http_date;
use crate::store::StoredEntry;

/// Fixed lifetime advertised to the edge for every cache hit. The edge
/// treats hits as long-lived regardless of the original response's own
/// caching directives; freshness is managed by purge, not by expiry.
pub const CDN_CACHE_CONTROL: &str = "public, max-age=31536000";

/// A fully materialized HTTP response.
///
/// Bodies are complete byte payloads: the object store needs a
/// length-known payload up front, so streaming bodies must be collected
/// by the caller before `put`.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl CachedResponse {
    /// Rehydrate a response from a stored entry.
    ///
    /// Headers are the decoded metadata subset plus computed fields: the
    /// store fingerprint as `ETag`, size as `Content-Length`, write time
    /// as `Last-Modified`, and the fixed [`CDN_CACHE_CONTROL`] directive.
    /// The status line comes from the stored custom metadata, defaulting
    /// to `200 OK` with a body and `304 Not Modified` without one.
    pub(crate) fn from_entry(entry: StoredEntry) -> Self {
        let mut headers = entry.http_metadata.to_headers();
        headers.push(("ETag".to_string(), entry.descriptor.etag.clone()));
        headers.push((
            "Content-Length".to_string(),
            entry.descriptor.size.to_string(),
        ));
        headers.push((
            "Last-Modified".to_string(),
            format_http_date(entry.descriptor.uploaded_at),
        ));
        headers.push((
            "CDN-Cache-Control".to_string(),
            CDN_CACHE_CONTROL.to_string(),
        ));

        let default_status: u16 = if entry.body.is_empty() { 304 } else { 200 };
        let status = entry
            .custom_metadata
            .status_code
            .as_deref()
            .and_then(|code| code.parse().ok())
            .unwrap_or(default_status);
        let status_text = entry
            .custom_metadata
            .status_text
            .clone()
            .unwrap_or_else(|| default_status_text(status).to_string());

        Self {
            status,
            status_text,
            headers,
            body: entry.body,
        }
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn default_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        304 => "Not Modified",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::metadata::{CustomMetadata, HttpMetadata};
    use crate::store::ObjectDescriptor;

    fn entry(body: &'static [u8], custom: CustomMetadata) -> StoredEntry {
        StoredEntry {
            body: Bytes::from_static(body),
            descriptor: ObjectDescriptor {
                key: "/blog/post-1".to_string(),
                size: body.len() as u64,
                etag: "abc123".to_string(),
                uploaded_at: Utc::now(),
            },
            http_metadata: HttpMetadata {
                content_type: Some("text/html".to_string()),
                ..Default::default()
            },
            custom_metadata: custom,
        }
    }

    #[test]
    fn computed_headers_are_always_present() {
        let response = CachedResponse::from_entry(entry(b"hello", CustomMetadata::default()));
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.header("ETag"), Some("abc123"));
        assert_eq!(response.header("Content-Length"), Some("5"));
        assert!(response.header("Last-Modified").is_some());
        assert_eq!(response.header("CDN-Cache-Control"), Some(CDN_CACHE_CONTROL));
    }

    #[test]
    fn status_defaults_to_200_with_body() {
        let response = CachedResponse::from_entry(entry(b"hello", CustomMetadata::default()));
        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
    }

    #[test]
    fn status_defaults_to_304_without_body() {
        let response = CachedResponse::from_entry(entry(b"", CustomMetadata::default()));
        assert_eq!(response.status, 304);
        assert_eq!(response.status_text, "Not Modified");
    }

    #[test]
    fn stored_status_overrides_default() {
        let custom = CustomMetadata {
            status_code: Some("404".to_string()),
            status_text: Some("Not Found".to_string()),
        };
        let response = CachedResponse::from_entry(entry(b"missing page", custom));
        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Not Found");
    }

    #[test]
    fn unparseable_stored_status_falls_back_to_default() {
        let custom = CustomMetadata {
            status_code: Some("teapot".to_string()),
            status_text: None,
        };
        let response = CachedResponse::from_entry(entry(b"hello", custom));
        assert_eq!(response.status, 200);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = CachedResponse::from_entry(entry(b"hello", CustomMetadata::default()));
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/html"));
    }
}
