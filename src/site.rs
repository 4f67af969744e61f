//! Tracked site data model.
//!
//! A [`Site`] is one monitored target: an owner, a URL, and the last
//! status recorded by a sweep.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[cfg(test)]
#[path = "site_tests.rs"]
mod tests;

/// Unique record key of a tracked site.
///
/// Assigned by the store at registration time. Status updates are always
/// keyed by this id, never by the owner, since one owner may track many sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the user who registered a site.
///
/// For the Telegram sink this is the chat id of the owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an owner id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last known reachability of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    /// Registered but never probed.
    #[default]
    NotChecked,
    /// The last probe succeeded.
    Online,
    /// The last probe failed.
    Down,
}

impl SiteStatus {
    /// Short marker used when listing sites to their owner.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Down => "🚨",
            Self::Online => "✅",
            Self::NotChecked => "⏳",
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotChecked => "not_checked",
            Self::Online => "online",
            Self::Down => "down",
        };
        f.write_str(name)
    }
}

/// A persisted, monitored site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Unique record key.
    pub id: SiteId,
    /// User who registered the site and receives its notifications.
    pub owner_id: OwnerId,
    /// Address probed on every sweep.
    pub url: Url,
    /// Status recorded by the most recent sweep.
    #[serde(default)]
    pub status: SiteStatus,
    /// Time of the most recent probe; `None` until the first sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<SystemTime>,
}

/// Error returned when a registration URL is not acceptable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteUrlError {
    /// The string does not parse as an absolute URL.
    #[error("Invalid URL '{url}': {reason}")]
    Malformed {
        /// The rejected input
        url: String,
        /// Parser message
        reason: String,
    },

    /// The URL parses but cannot be probed over HTTP.
    #[error("Unsupported URL scheme '{scheme}': expected http or https")]
    UnsupportedScheme {
        /// The rejected scheme
        scheme: String,
    },
}

/// A site that has passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSite {
    /// Registering user.
    pub owner_id: OwnerId,
    /// Validated absolute URL.
    pub url: Url,
}

impl NewSite {
    /// Validates `url` and builds a registration request.
    ///
    /// Surrounding whitespace is ignored, since the value usually comes
    /// straight from user input.
    ///
    /// # Errors
    ///
    /// Returns [`SiteUrlError`] if the URL is malformed, relative, or not http(s).
    pub fn parse(owner_id: OwnerId, url: &str) -> Result<Self, SiteUrlError> {
        let trimmed = url.trim();
        let parsed = Url::parse(trimmed).map_err(|e| SiteUrlError::Malformed {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(SiteUrlError::UnsupportedScheme {
                    scheme: other.to_string(),
                });
            }
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(SiteUrlError::Malformed {
                url: trimmed.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            owner_id,
            url: parsed,
        })
    }
}
