//! File-backed cache store.
//!
//! One file per key under the storage directory, named `{key}.cache`. Each file
//! holds a small JSON envelope with the write time, the TTL and the base64 body.
//! Writes go to a temporary file first and are renamed into place, so concurrent
//! readers in other processes never observe a half-written entry.

use super::backend::{is_expired, CacheBackend};
use super::clock::{unix_secs, Clock, SystemClock};
use super::key::CacheKey;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tokio::fs;

const ENTRY_EXT: &str = "cache";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    stored_at: u64,
    ttl_secs: u64,
    data: String,
}

impl DiskEntry {
    fn is_expired(&self, now: std::time::SystemTime) -> bool {
        is_expired(
            UNIX_EPOCH + Duration::from_secs(self.stored_at),
            Duration::from_secs(self.ttl_secs),
            now,
        )
    }
}

pub struct FileCache {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let name: String = key
            .hash
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.{}", name, ENTRY_EXT))
    }

    async fn read_entry(&self, path: &Path) -> Result<Option<DiskEntry>> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                remove_if_present(path).await?;
                Err(Error::cache_with_context(
                    format!("corrupt cache entry removed: {}", e),
                    ErrorContext::new()
                        .with_details(path.display().to_string())
                        .with_source("file_cache"),
                ))
            }
        }
    }

    async fn live_entry(&self, key: &CacheKey) -> Result<Option<DiskEntry>> {
        let path = self.entry_path(key);
        let Some(entry) = self.read_entry(&path).await? else {
            return Ok(None);
        };
        if entry.is_expired(self.clock.now()) {
            remove_if_present(&path).await?;
            return Ok(None);
        }
        Ok(Some(entry))
    }
}

#[async_trait]
impl CacheBackend for FileCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let Some(entry) = self.live_entry(key).await? else {
            return Ok(None);
        };
        let data = STANDARD.decode(entry.data.as_bytes()).map_err(|e| {
            Error::cache_with_context(
                format!("invalid entry body: {}", e),
                ErrorContext::new().with_source("file_cache"),
            )
        })?;
        Ok(Some(data))
    }

    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let entry = DiskEntry {
            stored_at: unix_secs(self.clock.now()),
            ttl_secs: ttl.as_secs(),
            data: STANDARD.encode(value),
        };
        let path = self.entry_path(key);
        let tmp = path.with_extension(format!(
            "tmp.{}.{}",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, serde_json::to_vec(&entry)?).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        remove_if_present(&self.entry_path(key)).await
    }

    async fn exists(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.live_entry(key).await?.is_some())
    }

    async fn clear(&self) -> Result<()> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXT) {
                remove_if_present(&path).await?;
            }
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let now = self.clock.now();
        let mut count = 0;
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
                continue;
            }
            if let Ok(Some(entry)) = self.read_entry(&path).await {
                if !entry.is_expired(now) {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

async fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
