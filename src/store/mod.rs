//! Persistence of tracked sites.
//!
//! This module provides the [`SiteStore`] seam consumed by a sweep and the
//! bundled JSON-file implementation ([`FileSiteStore`]).

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileSiteStore;

use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use thiserror::Error;
use url::Url;

use crate::site::{OwnerId, Site, SiteId, SiteStatus};

/// Fields written back for a site after it has been probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Status derived from the probe.
    pub status: SiteStatus,
    /// When the probe ran.
    pub last_checked_at: SystemTime,
}

/// Errors raised by a site store.
///
/// Every variant means the store could not serve the request; a sweep
/// treats them uniformly as "store unavailable".
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the backing file.
    #[error("Failed to read site store '{}': {source}", path.display())]
    Read {
        /// Path of the store file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The backing file exists but cannot be understood.
    ///
    /// Unlike a missing file this is never treated as an empty store, so a
    /// damaged file is not silently overwritten.
    #[error("Site store '{}' is corrupted: {reason}", path.display())]
    Corrupted {
        /// Path of the store file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Failed to take the lock guarding the backing file.
    #[error("Failed to lock site store '{}': {source}", path.display())]
    Lock {
        /// Path of the lock file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to write the backing file.
    #[error("Failed to write site store: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize the store contents.
    #[error("Failed to serialize site store: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The background I/O task did not complete.
    #[error("Site store task failed: {0}")]
    Task(String),

    /// No site with the given id exists.
    #[error("Site {0} not found")]
    NotFound(SiteId),

    /// The owner already tracks this URL.
    #[error("{owner} already tracks {url}")]
    Duplicate {
        /// The registering owner
        owner: OwnerId,
        /// The URL already tracked
        url: Url,
    },
}

/// Persisted collection of tracked sites.
///
/// A sweep only ever lists everything and writes back one site at a time;
/// writes are scoped to a single site and never batched across sites.
pub trait SiteStore: Send + Sync {
    /// Returns every tracked site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn list_all(&self) -> impl std::future::Future<Output = Result<Vec<Site>, StoreError>> + Send;

    /// Records the outcome of a probe for the site with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the site does not exist or the write fails.
    fn update(
        &self,
        id: SiteId,
        update: StatusUpdate,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
