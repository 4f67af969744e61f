//! Wall-clock abstraction.
//!
//! Sweeps stamp `last_checked_at` through [`Clock`] so tests can pin the
//! time a probe is recorded at.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current wall-clock time.
///
/// # Example
///
/// ```
/// use itsalive::time::{Clock, SystemClock};
///
/// let now = SystemClock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock delegating to [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Formats a timestamp as RFC 3339 in UTC, to the second.
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
/// assert_eq!(itsalive::time::rfc3339(time), "2023-11-14T22:13:20Z");
/// ```
#[must_use]
pub fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}
