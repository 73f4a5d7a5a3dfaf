use crate::cache::{CacheBackend, CacheConfig, CacheKeyGenerator, CacheManager, Clock, SystemClock};
use crate::client::blocking::BlockingVimeoClient;
use crate::client::config::{normalize_base_url, ClientConfig};
use crate::client::core::VimeoClient;
use crate::codec::ResponseFormat;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Builder for creating clients with custom configuration.
///
/// Precedence, lowest first: [`ClientConfig`] defaults or the supplied config,
/// `VIMEO_*` environment variables, then the explicit setters on this builder.
pub struct VimeoClientBuilder {
    config: ClientConfig,
    read_env: bool,
    base_url_override: Option<String>,
    cache_override: Option<CacheConfig>,
    simple_format: Option<ResponseFormat>,
    transport: Option<Arc<dyn Transport>>,
    cache_backend: Option<Box<dyn CacheBackend>>,
    clock: Option<Arc<dyn Clock>>,
    key_salt: Option<String>,
}

impl VimeoClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            read_env: true,
            base_url_override: None,
            cache_override: None,
            simple_format: None,
            transport: None,
            cache_backend: None,
            clock: None,
            key_salt: None,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Do not consult `VIMEO_*` environment variables.
    pub fn ignore_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Override the service base URL (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn cache_config(mut self, cache: CacheConfig) -> Self {
        self.cache_override = Some(cache);
        self
    }

    pub fn simple_format(mut self, format: ResponseFormat) -> Self {
        self.simple_format = Some(format);
        self
    }

    /// Inject a transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Inject a cache store instead of the engine named in the cache config.
    pub fn cache_backend(mut self, backend: Box<dyn CacheBackend>) -> Self {
        self.cache_backend = Some(backend);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn key_salt(mut self, salt: impl Into<String>) -> Self {
        self.key_salt = Some(salt.into());
        self
    }

    fn resolved_config(&mut self) -> ClientConfig {
        let mut config = std::mem::take(&mut self.config);
        if self.read_env {
            config = config.apply_env();
        }
        if let Some(url) = self.base_url_override.take() {
            config.base_url = url;
        }
        if let Some(cache) = self.cache_override.take() {
            config.cache = cache;
        }
        if let Some(format) = self.simple_format {
            config.simple_format = format;
        }
        config
    }

    /// Build the client.
    pub fn build(mut self) -> Result<VimeoClient> {
        let config = self.resolved_config();
        let base_url = normalize_base_url(&config.base_url)?;

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(
                config.timeout(),
                config.proxy_url.as_deref(),
            )?),
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let cache = match self.cache_backend {
            Some(backend) => CacheManager::new(config.cache.clone(), backend),
            None => CacheManager::from_config(config.cache.clone(), clock),
        };

        let mut keys = CacheKeyGenerator::new();
        if let Some(salt) = self.key_salt {
            keys = keys.with_salt(salt);
        }

        info!(
            base_url = %base_url,
            format = config.simple_format.extension(),
            cache = cache.backend_name(),
            ttl_secs = config.cache.ttl.as_secs(),
            "vimeo client ready"
        );

        Ok(VimeoClient {
            base_url,
            simple_format: config.simple_format,
            transport,
            cache,
            keys,
        })
    }

    /// Build a client with a synchronous, blocking API.
    pub fn build_blocking(self) -> Result<BlockingVimeoClient> {
        BlockingVimeoClient::new(self.build()?)
    }
}

impl Default for VimeoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEngine;
    use crate::Error;

    #[test]
    fn test_explicit_settings_win() {
        let config = ClientConfig {
            base_url: "http://from-config.test".into(),
            ..ClientConfig::default()
        };
        let client = VimeoClientBuilder::new()
            .ignore_env()
            .config(config)
            .base_url_override("http://override.test/")
            .cache_config(CacheConfig::new().with_engine(CacheEngine::Memory))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://override.test");
        assert_eq!(client.cache().backend_name(), "memory");
        assert_eq!(client.simple_format(), ResponseFormat::Php);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = VimeoClientBuilder::new()
            .ignore_env()
            .base_url_override("not a url")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_disabled_cache_uses_null_store() {
        let client = VimeoClientBuilder::new()
            .ignore_env()
            .cache_config(CacheConfig::new().with_enabled(false))
            .build()
            .unwrap();
        assert_eq!(client.cache().backend_name(), "null");
    }
}
