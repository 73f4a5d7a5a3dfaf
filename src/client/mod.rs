//! Client implementation, configuration and builders.

mod blocking;
mod builder;
mod config;
mod core;
mod oembed;

pub use blocking::BlockingVimeoClient;
pub use builder::VimeoClientBuilder;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use self::core::VimeoClient;
pub use oembed::OembedOptions;
