//! oEmbed query options.

use std::collections::{BTreeMap, HashMap};
use url::form_urlencoded::byte_serialize;

/// Extra query parameters for the oEmbed endpoint (`width`, `maxheight`, `autoplay`, ...).
///
/// Options are kept sorted by key so that the same set always produces the same
/// URL, and therefore the same cache entry, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OembedOptions(BTreeMap<String, String>);

impl OembedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `&key=value` pairs, form-encoded, ready to append to the oEmbed URL.
    pub(crate) fn query_suffix(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| {
                format!(
                    "&{}={}",
                    byte_serialize(k.as_bytes()).collect::<String>(),
                    byte_serialize(v.as_bytes()).collect::<String>()
                )
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OembedOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for OembedOptions {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<HashMap<String, String>> for OembedOptions {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}
