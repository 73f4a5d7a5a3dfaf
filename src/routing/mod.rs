//! Request routing: maps a resource category and sub-request to a Simple API path.
//!
//! Every category carries a fixed allow-list of sub-requests. A route is only
//! materialized when its sub-request is on that list and its identifying name is
//! a single usable path segment; otherwise the constructors return `None`, which
//! callers treat as "no result" rather than an error.
//!
//! Blank means empty, whitespace-only or `"0"`. Identifiers must also be a
//! single path segment: `/`, `?`, `#`, `&`, `%`, `\`, whitespace, control characters
//! and the dot segments `.` and `..` are rejected.
//!
//! ```rust
//! use vimeo_simple::routing::{ResourceCategory, Route};
//!
//! let route = Route::resource(ResourceCategory::User, "joe", "clips").unwrap();
//! assert_eq!(route.path(), "joe/clips");
//!
//! assert!(Route::resource(ResourceCategory::User, "joe", "nonsense").is_none());
//! assert_eq!(Route::video("12345").unwrap().path(), "clip/12345");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const USER_REQUESTS: &[&str] = &[
    "info",
    "clips",
    "likes",
    "appears_in",
    "all_clips",
    "subscriptions",
    "albums",
    "channels",
    "groups",
    "contacts_clips",
    "contacts_like",
];

const ACTIVITY_REQUESTS: &[&str] = &[
    "user_did",
    "happened_to_user",
    "contacts_did",
    "happened_to_contacts",
    "everyone_did",
];

const GROUP_REQUESTS: &[&str] = &["clips", "users", "info"];

const CHANNEL_REQUESTS: &[&str] = &["clips", "info"];

const ALBUM_REQUESTS: &[&str] = &["clips", "info"];

/// Resource families exposed by the Simple API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    User,
    Activity,
    Group,
    Channel,
    Album,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 5] = [
        ResourceCategory::User,
        ResourceCategory::Activity,
        ResourceCategory::Group,
        ResourceCategory::Channel,
        ResourceCategory::Album,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCategory::User => "user",
            ResourceCategory::Activity => "activity",
            ResourceCategory::Group => "group",
            ResourceCategory::Channel => "channel",
            ResourceCategory::Album => "album",
        }
    }

    /// Sub-requests the upstream API accepts for this category.
    pub fn allowed_requests(self) -> &'static [&'static str] {
        match self {
            ResourceCategory::User => USER_REQUESTS,
            ResourceCategory::Activity => ACTIVITY_REQUESTS,
            ResourceCategory::Group => GROUP_REQUESTS,
            ResourceCategory::Channel => CHANNEL_REQUESTS,
            ResourceCategory::Album => ALBUM_REQUESTS,
        }
    }

    pub fn allows(self, request: &str) -> bool {
        self.allowed_requests().contains(&request)
    }

    /// Leading path segment. User paths start directly with the username.
    fn path_prefix(self) -> Option<&'static str> {
        match self {
            ResourceCategory::User => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource category: {0}")]
pub struct UnknownCategory(pub String);

/// A validated Simple API request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Video(String),
    Resource {
        category: ResourceCategory,
        name: String,
        request: String,
    },
}

impl Route {
    pub fn video(video_id: &str) -> Option<Route> {
        if !is_valid_identifier(video_id) {
            return None;
        }
        Some(Route::Video(video_id.to_string()))
    }

    pub fn resource(category: ResourceCategory, name: &str, request: &str) -> Option<Route> {
        if !is_valid_identifier(name) || is_blank(request) || !category.allows(request) {
            return None;
        }
        Some(Route::Resource {
            category,
            name: name.to_string(),
            request: request.to_string(),
        })
    }

    /// Endpoint path relative to the API root, without the format extension.
    pub fn path(&self) -> String {
        match self {
            Route::Video(id) => format!("clip/{}", id),
            Route::Resource {
                category,
                name,
                request,
            } => match category.path_prefix() {
                Some(prefix) => format!("{}/{}/{}", prefix, name, request),
                None => format!("{}/{}", name, request),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == "0"
}

/// Non-blank and safe to place as one path segment.
pub(crate) fn is_valid_identifier(s: &str) -> bool {
    if is_blank(s) || s == "." || s == ".." {
        return false;
    }
    !s.chars().any(|c| {
        matches!(c, '/' | '?' | '#' | '&' | '%' | '\\') || c.is_whitespace() || c.is_control()
    })
}
