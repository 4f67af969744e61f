//! Default values for configuration options.

use std::path::PathBuf;
use std::time::Duration;

/// Default probe timeout in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Default interval between sweeps in `watch` mode, in seconds.
pub const SWEEP_INTERVAL_SECS: u64 = 300;

/// Default Telegram Bot API base URL.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Store file name inside the data directory.
pub const STORE_FILE_NAME: &str = "sites.json";

/// Default probe timeout as Duration.
#[must_use]
pub const fn probe_timeout() -> Duration {
    Duration::from_secs(PROBE_TIMEOUT_SECS)
}

/// Default sweep interval as Duration.
#[must_use]
pub const fn sweep_interval() -> Duration {
    Duration::from_secs(SWEEP_INTERVAL_SECS)
}

/// Default store location: `<data dir>/itsalive/sites.json`.
///
/// Falls back to `sites.json` in the working directory when the platform
/// has no data directory.
#[must_use]
pub fn store_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(STORE_FILE_NAME),
        |dir| dir.join("itsalive").join(STORE_FILE_NAME),
    )
}
