//! Edge cache purge client.
//!
//! Invalidations are pushed to the edge zone through its control API.
//! The client is optional at the cache level: with no edge configured,
//! every purge is a no-op and the cache runs as a pure origin-store cache.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::EdgeConfig;
use crate::error::PurgeError;

/// Purge operations against an edge/CDN zone.
#[async_trait]
pub trait EdgePurge: Send + Sync {
    /// Discard edge copies of exactly the given absolute URLs.
    async fn purge_urls(&self, urls: &[Url]) -> Result<(), PurgeError>;

    /// Discard every edge copy in the zone.
    ///
    /// Categorically more expensive than [`EdgePurge::purge_urls`]: the
    /// next request for every path recomputes at the origin. Last resort.
    async fn purge_all(&self) -> Result<(), PurgeError>;
}

/// Purge client for a Cloudflare-style zone control API.
pub struct HttpPurgeClient {
    client: Client,
    endpoint: Url,
    api_token: String,
}

impl HttpPurgeClient {
    /// Build a client for the zone named by `config`.
    pub fn new(config: &EdgeConfig) -> Result<Self, PurgeError> {
        let endpoint = Url::parse(&format!(
            "{}/zones/{}/purge_cache",
            config.endpoint.trim_end_matches('/'),
            config.zone_id
        ))?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("brezza/", env!("CARGO_PKG_VERSION"))
    }

    /// Endpoint the purge requests are POSTed to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, body: serde_json::Value) -> Result<(), PurgeError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PurgeError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EdgePurge for HttpPurgeClient {
    async fn purge_urls(&self, urls: &[Url]) -> Result<(), PurgeError> {
        if urls.is_empty() {
            return Ok(());
        }
        let files: Vec<&str> = urls.iter().map(Url::as_str).collect();
        debug!(count = files.len(), "purging edge URLs");
        self.post(serde_json::json!({ "files": files })).await
    }

    async fn purge_all(&self) -> Result<(), PurgeError> {
        debug!("purging entire edge zone");
        self.post(serde_json::json!({ "purge_everything": true }))
            .await
    }
}
