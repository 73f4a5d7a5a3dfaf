//! HTTP transport used to reach the upstream API.

mod http;

pub use http::{HttpTransport, TransportError};

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Minimal capability the client needs from the network: a GET returning the raw body.
///
/// Implementations report non-success statuses as [`crate::Error::Remote`] so the
/// client never caches an error page.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Bytes>;
}
