//! HTTP metadata codec.
//!
//! An object store persists content plus a small set of named metadata
//! fields; it has no notion of HTTP headers or status lines. This module
//! maps the subset of response headers the store can represent into those
//! fields and back, so a stored object can be rehydrated into a response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// IMF-fixdate, the canonical HTTP date form (RFC 9110 §5.6.7).
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The six headers the object store can persist as named metadata fields.
const CACHE_CONTROL: &str = "cache-control";
const EXPIRES: &str = "expires";
const CONTENT_TYPE: &str = "content-type";
const CONTENT_DISPOSITION: &str = "content-disposition";
const CONTENT_ENCODING: &str = "content-encoding";
const CONTENT_LANGUAGE: &str = "content-language";

/// HTTP header subset persisted as object-store metadata.
///
/// Absent headers stay absent; no field is ever defaulted in either
/// direction. `cache_expiry` is the parsed form of the `Expires` header
/// and is re-rendered as a UTC IMF-fixdate on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpMetadata {
    pub cache_control: Option<String>,
    pub cache_expiry: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub content_language: Option<String>,
}

impl HttpMetadata {
    /// Extract the persistable header subset from response headers.
    ///
    /// Header names match case-insensitively. An `Expires` value that does
    /// not parse as an HTTP date is dropped rather than stored raw.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut metadata = Self::default();
        for (name, value) in headers {
            match name.to_ascii_lowercase().as_str() {
                CACHE_CONTROL => metadata.cache_control = Some(value.to_string()),
                EXPIRES => metadata.cache_expiry = parse_http_date(value),
                CONTENT_TYPE => metadata.content_type = Some(value.to_string()),
                CONTENT_DISPOSITION => metadata.content_disposition = Some(value.to_string()),
                CONTENT_ENCODING => metadata.content_encoding = Some(value.to_string()),
                CONTENT_LANGUAGE => metadata.content_language = Some(value.to_string()),
                _ => {}
            }
        }
        metadata
    }

    /// Inverse of [`HttpMetadata::from_headers`]: render the present fields
    /// back into headers under their canonical names.
    pub fn to_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(value) = &self.cache_control {
            headers.push(("Cache-Control".to_string(), value.clone()));
        }
        if let Some(expiry) = self.cache_expiry {
            headers.push(("Expires".to_string(), format_http_date(expiry)));
        }
        if let Some(value) = &self.content_type {
            headers.push(("Content-Type".to_string(), value.clone()));
        }
        if let Some(value) = &self.content_disposition {
            headers.push(("Content-Disposition".to_string(), value.clone()));
        }
        if let Some(value) = &self.content_encoding {
            headers.push(("Content-Encoding".to_string(), value.clone()));
        }
        if let Some(value) = &self.content_language {
            headers.push(("Content-Language".to_string(), value.clone()));
        }
        headers
    }
}

/// Free-form metadata fields carried next to the HTTP subset. They record
/// the status line, which object stores have no native field for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomMetadata {
    pub status_code: Option<String>,
    pub status_text: Option<String>,
}

/// Parse an HTTP date (IMF-fixdate / RFC 2822 form) to UTC.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Render a UTC datetime as an IMF-fixdate string.
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}
