//! # vimeo-simple
//!
//! Cached, read-only client for the Vimeo Simple API and oEmbed endpoint.
//!
//! ## Overview
//!
//! Method calls are routed to endpoint paths, validated against a fixed
//! allow-list per resource category, fetched over HTTP, decoded and memoized in
//! a cache keyed by the request URL. Repeated calls inside the cache TTL (one
//! day by default) never reach the network.
//!
//! ## Key Features
//!
//! - **Routing**: [`routing::Route`] validates category/sub-request pairs before any I/O
//! - **Caching**: file, memory or no-op stores via the [`cache`] module
//! - **Decoding**: legacy PHP-serialized and JSON bodies via [`codec`]
//! - **Two call models**: async [`VimeoClient`] and synchronous [`BlockingVimeoClient`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vimeo_simple::{OembedOptions, VimeoClient};
//!
//! #[tokio::main]
//! async fn main() -> vimeo_simple::Result<()> {
//!     let client = VimeoClient::new()?;
//!
//!     // `None` means the request was not valid (blank name, unknown sub-request).
//!     if let Some(clips) = client.user_request("joe", "clips").await? {
//!         println!("{}", clips);
//!     }
//!
//!     let options = OembedOptions::new().with("width", "400");
//!     if let Some(html) = client.embed("12345", &options).await? {
//!         println!("{}", html);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`routing`] | Resource categories, allow-lists and endpoint paths |
//! | [`client`] | Clients, builder and configuration |
//! | [`cache`] | Cache keys, stores and the cache manager |
//! | [`codec`] | Response body decoding |
//! | [`transport`] | HTTP transport |

pub mod cache;
pub mod client;
pub mod codec;
pub mod routing;
pub mod transport;

// Re-export main types for convenience
pub use client::{BlockingVimeoClient, ClientConfig, OembedOptions, VimeoClient, VimeoClientBuilder};
pub use codec::{Payload, ResponseFormat};
pub use routing::{ResourceCategory, Route};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
