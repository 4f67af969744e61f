//! "Run one sweep now" entry point for external schedulers.

use http::StatusCode;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::notify::NotificationSink;
use crate::probe::Prober;
use crate::store::SiteStore;
use crate::time::Clock;

use super::{SweepError, SweepReport, SweepRunner};

/// JSON body describing the result of a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Human-readable outcome.
    pub message: String,
    /// Number of sites probed.
    pub checked: usize,
    /// Number of notifications delivered.
    pub notified: usize,
    /// Per-site failures.
    pub errors: Vec<SiteFailureSummary>,
}

/// Serializable view of a [`SiteFailure`](super::SiteFailure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFailureSummary {
    /// Id of the failing site.
    pub site_id: u64,
    /// URL of the failing site.
    pub url: String,
    /// Error message.
    pub error: String,
}

/// Result of [`Trigger::fire`]: an HTTP-style status plus a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerResponse {
    /// `200` when the sweep completed, even with per-site failures;
    /// `500` when the site list could not be fetched;
    /// `409` when another sweep was already running.
    pub status: StatusCode,
    /// Response body.
    pub summary: SweepSummary,
}

impl TriggerResponse {
    fn completed(report: &SweepReport) -> Self {
        let errors = report
            .errors
            .iter()
            .map(|f| SiteFailureSummary {
                site_id: f.site_id.0,
                url: f.url.to_string(),
                error: f.error.to_string(),
            })
            .collect();

        Self {
            status: StatusCode::OK,
            summary: SweepSummary {
                message: "sweep completed".to_string(),
                checked: report.checked,
                notified: report.notified,
                errors,
            },
        }
    }

    fn failed(error: &SweepError) -> Self {
        Self::empty(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }

    fn busy() -> Self {
        Self::empty(StatusCode::CONFLICT, "sweep already in progress".to_string())
    }

    fn empty(status: StatusCode, message: String) -> Self {
        Self {
            status,
            summary: SweepSummary {
                message,
                checked: 0,
                notified: 0,
                errors: Vec::new(),
            },
        }
    }

    /// Returns true if the sweep ran to completion.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Serializes sweeps so at most one is in flight at a time.
///
/// A trigger that arrives while a sweep is running is answered at once with
/// `409 Conflict` and does no work; the scheduler's next tick retries.
#[derive(Debug)]
pub struct Trigger<S, P, N, C> {
    runner: SweepRunner<S, P, N, C>,
    in_flight: Mutex<()>,
}

impl<S, P, N, C> Trigger<S, P, N, C> {
    /// Wraps a runner.
    #[must_use]
    pub fn new(runner: SweepRunner<S, P, N, C>) -> Self {
        Self {
            runner,
            in_flight: Mutex::new(()),
        }
    }

    /// Returns the wrapped runner.
    #[must_use]
    pub const fn runner(&self) -> &SweepRunner<S, P, N, C> {
        &self.runner
    }
}

impl<S, P, N, C> Trigger<S, P, N, C>
where
    S: SiteStore,
    P: Prober,
    N: NotificationSink,
    C: Clock,
{
    /// Runs one sweep now, unless one is already running.
    pub async fn fire(&self) -> TriggerResponse {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("Sweep requested while another is running, skipping");
            return TriggerResponse::busy();
        };

        match self.runner.run().await {
            Ok(report) => TriggerResponse::completed(&report),
            Err(e) => {
                tracing::error!("Sweep aborted: {e}");
                TriggerResponse::failed(&e)
            }
        }
    }
}
