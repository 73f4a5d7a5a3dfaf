//! Response body decoding.
//!
//! The Simple API answers in the format named by the endpoint extension. The
//! original endpoints return PHP `serialize()` output; `.json` is also served.
//! The oEmbed endpoint always returns JSON. Both decode into a [`Payload`].
//!
//! Decoding works on the raw body bytes: serialized string lengths count bytes,
//! so no charset conversion may happen before the decoder runs.

pub mod php;

use crate::{ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Decoded upstream response. Its shape is owned by the upstream API.
pub type Payload = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Php,
    Json,
}

impl ResponseFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ResponseFormat::Php => "php",
            ResponseFormat::Json => "json",
        }
    }
}

pub fn decode(format: ResponseFormat, body: &[u8]) -> Result<Payload> {
    match format {
        ResponseFormat::Php => php::from_slice(body),
        ResponseFormat::Json => serde_json::from_slice(body).map_err(|e| {
            crate::Error::decode_with_context(
                format!("invalid JSON body: {}", e),
                ErrorContext::new().with_source("json_decoder"),
            )
        }),
    }
}
