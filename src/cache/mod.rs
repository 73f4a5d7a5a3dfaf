//! Response caching: memoizes decoded payloads keyed by request URL.
//!
//! # Response Caching Module
//!
//! Every fetched URL is hashed into a [`CacheKey`]; the decoded payload is stored
//! under that key for the configured TTL (one day by default) and served from
//! the store on later calls with the same URL.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | Prefixing, payload encoding and hit/miss statistics |
//! | [`CacheConfig`] | Engine, TTL, storage path and key prefix of the namespace |
//! | [`CacheBackend`] | Trait for implementing custom cache backends |
//! | [`FileCache`] | One file per entry, survives process restarts (default) |
//! | [`MemoryCache`] | In-memory LRU cache implementation |
//! | [`NullCache`] | No-op cache for disabling caching |
//! | [`CacheKeyGenerator`] | SHA-256 keys derived from request URLs |
//! | [`Clock`] | Time source used for expiry |
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vimeo_simple::cache::{CacheConfig, CacheEngine, CacheManager, SystemClock};
//!
//! let config = CacheConfig::new()
//!     .with_engine(CacheEngine::Memory)
//!     .with_ttl(Duration::from_secs(3600));
//! let cache = CacheManager::from_config(config, Arc::new(SystemClock));
//! assert_eq!(cache.backend_name(), "memory");
//! ```

mod backend;
mod clock;
mod file;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use file::FileCache;
pub use key::{CacheKey, CacheKeyGenerator};
pub use manager::{CacheConfig, CacheEngine, CacheManager, CacheStats};
