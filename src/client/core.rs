use crate::cache::{CacheKeyGenerator, CacheManager, CacheStats};
use crate::client::builder::VimeoClientBuilder;
use crate::client::oembed::OembedOptions;
use crate::codec::{self, Payload, ResponseFormat};
use crate::routing::{is_valid_identifier, ResourceCategory, Route};
use crate::transport::Transport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cached client for the Simple API and the oEmbed endpoint.
///
/// Request operations return `Ok(None)` for invalid input (blank identifiers or a
/// sub-request outside the category's allow-list) without touching the network.
/// `Err` means a fetch was attempted and failed; `Ok(Some(_))` carries the decoded
/// payload, which may legitimately be empty.
pub struct VimeoClient {
    pub(crate) base_url: String,
    pub(crate) simple_format: ResponseFormat,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) cache: CacheManager,
    pub(crate) keys: CacheKeyGenerator,
}

impl VimeoClient {
    pub fn builder() -> VimeoClientBuilder {
        VimeoClientBuilder::new()
    }

    /// Client with default configuration plus environment overrides.
    pub fn new() -> Result<Self> {
        VimeoClientBuilder::new().build()
    }

    pub async fn video(&self, video_id: &str) -> Result<Option<Payload>> {
        self.route(Route::video(video_id)).await
    }

    pub async fn user_request(&self, username: &str, request: &str) -> Result<Option<Payload>> {
        self.resource(ResourceCategory::User, username, request).await
    }

    pub async fn activity_request(&self, username: &str, request: &str) -> Result<Option<Payload>> {
        self.resource(ResourceCategory::Activity, username, request)
            .await
    }

    pub async fn group_request(&self, group_name: &str, request: &str) -> Result<Option<Payload>> {
        self.resource(ResourceCategory::Group, group_name, request)
            .await
    }

    pub async fn channel_request(
        &self,
        channel_name: &str,
        request: &str,
    ) -> Result<Option<Payload>> {
        self.resource(ResourceCategory::Channel, channel_name, request)
            .await
    }

    pub async fn album_request(&self, album_name: &str, request: &str) -> Result<Option<Payload>> {
        self.resource(ResourceCategory::Album, album_name, request)
            .await
    }

    /// Category-generic form of the `*_request` operations.
    pub async fn resource(
        &self,
        category: ResourceCategory,
        name: &str,
        request: &str,
    ) -> Result<Option<Payload>> {
        self.route(Route::resource(category, name, request)).await
    }

    async fn route(&self, route: Option<Route>) -> Result<Option<Payload>> {
        let Some(route) = route else {
            return Ok(None);
        };
        let url = self.simple_url(&route);
        self.fetch(&url, self.simple_format).await.map(Some)
    }

    /// Fully-qualified Simple API URL for a route.
    pub fn simple_url(&self, route: &Route) -> String {
        format!(
            "{}/api/{}.{}",
            self.base_url,
            route.path(),
            self.simple_format.extension()
        )
    }

    /// oEmbed URL for a video, or `None` when the identifier is blank or not a
    /// single path segment.
    pub fn oembed_url(&self, video_id: &str, options: &OembedOptions) -> Option<String> {
        if !is_valid_identifier(video_id) {
            return None;
        }
        Some(format!(
            "{base}/api/oembed.json?url={base}/{id}{opts}",
            base = self.base_url,
            id = video_id,
            opts = options.query_suffix()
        ))
    }

    pub async fn oembed(&self, video_id: &str, options: &OembedOptions) -> Result<Option<Payload>> {
        let Some(url) = self.oembed_url(video_id, options) else {
            return Ok(None);
        };
        self.fetch(&url, ResponseFormat::Json).await.map(Some)
    }

    /// Embed markup: the `html` field of the oEmbed response.
    pub async fn embed(&self, video_id: &str, options: &OembedOptions) -> Result<Option<String>> {
        let Some(payload) = self.oembed(video_id, options).await? else {
            return Ok(None);
        };
        match payload.get("html").and_then(|v| v.as_str()) {
            Some(html) => Ok(Some(html.to_string())),
            None => Err(Error::decode_with_context(
                "oEmbed response has no html markup",
                ErrorContext::new()
                    .with_field_path("html")
                    .with_details(format!("video {}", video_id))
                    .with_source("oembed"),
            )),
        }
    }

    /// Serve `url` from the cache, or fetch, decode and store it.
    ///
    /// Cache-store failures never fail the call: a failed read falls through to
    /// the network and a failed write is only logged.
    pub async fn fetch(&self, url: &str, format: ResponseFormat) -> Result<Payload> {
        let key = self.keys.for_url(url);
        match self.cache.get::<Payload>(&key).await {
            Ok(Some(payload)) => {
                debug!(url, key = %key, "cache hit");
                return Ok(payload);
            }
            Ok(None) => debug!(url, key = %key, "cache miss"),
            Err(e) => warn!(url, error = %e, "cache read failed; fetching from origin"),
        }

        let body = self.transport.get(url).await?;
        let payload = codec::decode(format, &body)?;

        if let Err(e) = self.cache.set(&key, &payload).await {
            warn!(url, error = %e, "cache write failed");
        }
        Ok(payload)
    }

    /// Drop the cached response for `url`, if any.
    pub async fn invalidate(&self, url: &str) -> Result<bool> {
        self.cache.delete(&self.keys.for_url(url)).await
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.clear().await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn simple_format(&self) -> ResponseFormat {
        self.simple_format
    }
}
