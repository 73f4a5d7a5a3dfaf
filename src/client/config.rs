//! Client configuration: defaults, YAML files and environment overrides.

use crate::cache::CacheConfig;
use crate::codec::ResponseFormat;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://vimeo.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the service; `/api/...` is appended per request.
    pub base_url: String,
    /// Overall request timeout. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
    pub proxy_url: Option<String>,
    /// Format requested from the Simple API endpoints.
    pub simple_format: ResponseFormat,
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            proxy_url: None,
            simple_format: ResponseFormat::Php,
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid client configuration: {}", e),
                ErrorContext::new().with_source("client_config"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Apply overrides from the process environment:
    ///
    /// - `VIMEO_BASE_URL`
    /// - `VIMEO_HTTP_TIMEOUT_SECS`
    /// - `VIMEO_PROXY_URL`
    /// - `VIMEO_CACHE_DIR`
    /// - `VIMEO_CACHE_TTL_SECS`
    /// - `VIMEO_CACHE_DISABLED` (`1` disables caching)
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("VIMEO_BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(secs) = lookup("VIMEO_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = Some(secs);
        }
        if let Some(proxy) = lookup("VIMEO_PROXY_URL").filter(|s| !s.trim().is_empty()) {
            self.proxy_url = Some(proxy);
        }
        if let Some(dir) = lookup("VIMEO_CACHE_DIR").filter(|s| !s.trim().is_empty()) {
            self.cache.storage_path = PathBuf::from(dir);
        }
        if let Some(ttl) = lookup("VIMEO_CACHE_TTL_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.cache.ttl = Duration::from_secs(ttl);
        }
        if lookup("VIMEO_CACHE_DISABLED").as_deref() == Some("1") {
            self.cache.enabled = false;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Validated base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> Result<String> {
        normalize_base_url(&self.base_url)
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let ctx = || {
        ErrorContext::new()
            .with_field_path("base_url")
            .with_details(raw.to_string())
    };
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::configuration_with_context(format!("invalid base url: {}", e), ctx()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            "base url must use http or https",
            ctx(),
        ));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::configuration_with_context(
            "base url must not carry a query or fragment",
            ctx(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEngine;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://vimeo.com");
        assert_eq!(config.simple_format, ResponseFormat::Php);
        assert_eq!(config.cache.ttl, Duration::from_secs(86_400));
        assert_eq!(config.cache.engine, CacheEngine::File);
        assert_eq!(config.cache.key_prefix.as_deref(), Some("vimeo_"));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
base_url: https://vimeo.example/
simple_format: json
cache:
  engine: memory
  ttl_secs: 600
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.normalized_base_url().unwrap(), "https://vimeo.example");
        assert_eq!(config.simple_format, ResponseFormat::Json);
        assert_eq!(config.cache.engine, CacheEngine::Memory);
        assert_eq!(config.cache.ttl, Duration::from_secs(600));
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_yaml_file_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vimeo.yaml");
        std::fs::write(&path, "cache: [not, a, map]").unwrap();
        let err = ClientConfig::from_yaml_file(&path).unwrap_err();
        let details = err.context().and_then(|c| c.details.clone()).unwrap();
        assert!(details.ends_with("vimeo.yaml"));

        let missing = ClientConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, Error::Io(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VIMEO_BASE_URL", "http://localhost:8080"),
            ("VIMEO_HTTP_TIMEOUT_SECS", "15"),
            ("VIMEO_CACHE_DIR", "/var/cache/vimeo"),
            ("VIMEO_CACHE_TTL_SECS", "60"),
            ("VIMEO_CACHE_DISABLED", "1"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::default()
            .apply_env_with(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.cache.storage_path, PathBuf::from("/var/cache/vimeo"));
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert!(!config.cache.enabled);
        assert_eq!(config.proxy_url, None);
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let config = ClientConfig::default().apply_env_with(|name| match name {
            "VIMEO_HTTP_TIMEOUT_SECS" => Some("soon".to_string()),
            "VIMEO_CACHE_DISABLED" => Some("yes".to_string()),
            _ => None,
        });
        assert_eq!(config.timeout(), None);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_base_url_validation() {
        assert_eq!(normalize_base_url("http://vimeo.com/").unwrap(), "http://vimeo.com");
        for bad in ["", "vimeo.com", "ftp://vimeo.com", "http://vimeo.com/?x=1"] {
            let err = normalize_base_url(bad).unwrap_err();
            assert!(matches!(err, Error::Configuration { .. }), "{:?} accepted", bad);
        }
    }
}
