//! Synchronous facade over [`VimeoClient`].

use crate::cache::CacheStats;
use crate::client::builder::VimeoClientBuilder;
use crate::client::core::VimeoClient;
use crate::client::oembed::OembedOptions;
use crate::codec::{Payload, ResponseFormat};
use crate::routing::ResourceCategory;
use crate::Result;
use tokio::runtime::{Builder, Runtime};

/// Blocking client: each call performs at most one network round-trip and
/// returns when it completes.
///
/// It owns a current-thread runtime, so it must not be used from inside an
/// async context; use [`VimeoClient`] there.
pub struct BlockingVimeoClient {
    inner: VimeoClient,
    runtime: Runtime,
}

impl BlockingVimeoClient {
    pub fn new(inner: VimeoClient) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    pub fn builder() -> VimeoClientBuilder {
        VimeoClientBuilder::new()
    }

    pub fn video(&self, video_id: &str) -> Result<Option<Payload>> {
        self.runtime.block_on(self.inner.video(video_id))
    }

    pub fn user_request(&self, username: &str, request: &str) -> Result<Option<Payload>> {
        self.runtime.block_on(self.inner.user_request(username, request))
    }

    pub fn activity_request(&self, username: &str, request: &str) -> Result<Option<Payload>> {
        self.runtime
            .block_on(self.inner.activity_request(username, request))
    }

    pub fn group_request(&self, group_name: &str, request: &str) -> Result<Option<Payload>> {
        self.runtime
            .block_on(self.inner.group_request(group_name, request))
    }

    pub fn channel_request(&self, channel_name: &str, request: &str) -> Result<Option<Payload>> {
        self.runtime
            .block_on(self.inner.channel_request(channel_name, request))
    }

    pub fn album_request(&self, album_name: &str, request: &str) -> Result<Option<Payload>> {
        self.runtime
            .block_on(self.inner.album_request(album_name, request))
    }

    pub fn resource(
        &self,
        category: ResourceCategory,
        name: &str,
        request: &str,
    ) -> Result<Option<Payload>> {
        self.runtime
            .block_on(self.inner.resource(category, name, request))
    }

    pub fn oembed(&self, video_id: &str, options: &OembedOptions) -> Result<Option<Payload>> {
        self.runtime.block_on(self.inner.oembed(video_id, options))
    }

    pub fn embed(&self, video_id: &str, options: &OembedOptions) -> Result<Option<String>> {
        self.runtime.block_on(self.inner.embed(video_id, options))
    }

    pub fn fetch(&self, url: &str, format: ResponseFormat) -> Result<Payload> {
        self.runtime.block_on(self.inner.fetch(url, format))
    }

    pub fn invalidate(&self, url: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.invalidate(url))
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.runtime.block_on(self.inner.clear_cache())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache_stats()
    }

    pub fn inner(&self) -> &VimeoClient {
        &self.inner
    }
}
