//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use std::path::Path;
use vimeo_simple::cache::CacheConfig;
use vimeo_simple::VimeoClientBuilder;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builder pointed at the mock server with a file cache rooted in `cache_dir`.
pub fn builder_for(server: &ServerGuard, cache_dir: &Path) -> VimeoClientBuilder {
    init_tracing();
    VimeoClientBuilder::new()
        .ignore_env()
        .base_url_override(server.url())
        .cache_config(CacheConfig::new().with_storage_path(cache_dir))
}

/// Create a mock for a Simple API endpoint answering with a PHP-serialized body.
pub async fn mock_simple(server: &mut ServerGuard, path: &str, body: &str, hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

/// Create a mock for the oEmbed endpoint with exact query parameters.
pub async fn mock_oembed(
    server: &mut ServerGuard,
    video_id: &str,
    options: &[(&str, &str)],
    body: &str,
    hits: usize,
) -> Mock {
    let mut params = vec![Matcher::UrlEncoded(
        "url".into(),
        format!("{}/{}", server.url(), video_id),
    )];
    params.extend(
        options
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string())),
    );
    server
        .mock("GET", "/api/oembed.json")
        .match_query(Matcher::AllOf(params))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}
