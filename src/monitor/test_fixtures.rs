//! Shared test fixtures for monitor tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tokio::sync::Semaphore;
use url::Url;

use crate::probe::Prober;
use crate::site::{OwnerId, Site, SiteId, SiteStatus};
use crate::time::Clock;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Clock frozen at a fixed number of seconds after the epoch.
pub struct FixedClock(pub u64);

impl FixedClock {
    pub fn time(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.0)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.time()
    }
}

/// Prober answering from a per-URL table; unknown URLs are unreachable.
#[derive(Default)]
pub struct MockProber {
    outcomes: HashMap<Url, bool>,
    calls: Mutex<Vec<(Url, Duration)>>,
}

impl MockProber {
    pub fn reachable(mut self, url: &Url) -> Self {
        self.outcomes.insert(url.clone(), true);
        self
    }

    pub fn calls(&self) -> Vec<(Url, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Prober for MockProber {
    async fn probe(&self, url: &Url, timeout: Duration) -> bool {
        self.calls.lock().unwrap().push((url.clone(), timeout));
        self.outcomes.get(url).copied().unwrap_or(false)
    }
}

/// Prober that blocks until the test adds a permit to its gate.
pub struct GatedProber {
    pub gate: Arc<Semaphore>,
}

impl Prober for GatedProber {
    async fn probe(&self, _url: &Url, _timeout: Duration) -> bool {
        let _permit = self.gate.acquire().await;
        true
    }
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

pub fn site(id: u64, owner: &str, address: &str, status: SiteStatus) -> Site {
    Site {
        id: SiteId(id),
        owner_id: OwnerId::new(owner),
        url: url(address),
        status,
        last_checked_at: None,
    }
}
