//! Cache key generation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Derives content-addressed keys from fully-qualified request URLs.
///
/// The key is the lowercase hex SHA-256 of the URL, so equal URLs share an
/// entry and any difference in the URL (including query options) yields a
/// different one.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyGenerator {
    salt: Option<String>,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self { salt: None }
    }

    /// Mix a salt into every key, e.g. to invalidate a whole store after a format change.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn for_url(&self, url: &str) -> CacheKey {
        let mut hasher = Sha256::new();
        if let Some(ref s) = self.salt {
            hasher.update(s.as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(url.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        CacheKey::new(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_url_same_key() {
        let keys = CacheKeyGenerator::new();
        let url = "http://vimeo.com/api/joe/clips.php";
        assert_eq!(keys.for_url(url), keys.for_url(url));
        assert_eq!(keys.for_url(url).as_str().len(), 64);
    }

    #[test]
    fn test_known_digest() {
        let key = CacheKeyGenerator::new().for_url("");
        assert_eq!(
            key.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_distinct_urls_distinct_keys() {
        let keys = CacheKeyGenerator::new();
        let base = "http://vimeo.com/api/oembed.json?url=http://vimeo.com/12345";
        let a = keys.for_url(base);
        let b = keys.for_url(&format!("{}&width=400", base));
        let c = keys.for_url(&format!("{}&width=640", base));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_salt_changes_key() {
        let url = "http://vimeo.com/api/clip/1.php";
        let plain = CacheKeyGenerator::new().for_url(url);
        let salted = CacheKeyGenerator::new().with_salt("v2").for_url(url);
        assert_ne!(plain, salted);
    }
}
