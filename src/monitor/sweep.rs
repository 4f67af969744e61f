//! One sweep over every tracked site.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::notify::{DeliveryError, MessageTemplates, NotificationSink};
use crate::probe::Prober;
use crate::site::{Site, SiteId};
use crate::store::{SiteStore, StatusUpdate, StoreError};
use crate::time::{Clock, SystemClock};

use super::{Transition, evaluate};

/// A sweep could not start.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The site list could not be fetched; nothing was probed.
    #[error("Failed to list sites: {0}")]
    Store(#[from] StoreError),
}

/// What went wrong for a single site during a sweep.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The new status could not be written back.
    #[error("Failed to persist status: {0}")]
    Persist(#[source] StoreError),

    /// The owner could not be notified.
    #[error("Failed to notify owner: {0}")]
    Delivery(#[source] DeliveryError),
}

/// A per-site failure recorded in a [`SweepReport`].
#[derive(Debug)]
pub struct SiteFailure {
    /// The site that failed.
    pub site_id: SiteId,
    /// Its URL, for reporting.
    pub url: Url,
    /// The failure.
    pub error: SiteError,
}

impl SiteFailure {
    fn new(site: &Site, error: SiteError) -> Self {
        Self {
            site_id: site.id,
            url: site.url.clone(),
            error,
        }
    }
}

/// Outcome of a sweep that ran to completion.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Number of sites probed.
    pub checked: usize,
    /// Number of notifications delivered.
    pub notified: usize,
    /// Per-site failures, in processing order.
    pub errors: Vec<SiteFailure>,
}

/// Runs sweeps: probe, evaluate, persist and notify for every tracked site.
///
/// All collaborators are injected. Sites are processed one after another and
/// independently: a failure on one site is recorded in the report and never
/// prevents the others from being checked.
///
/// # Type Parameters
///
/// - `S`: the site store
/// - `P`: the prober
/// - `N`: the notification sink
/// - `C`: the clock stamping `last_checked_at` (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct SweepRunner<S, P, N, C = SystemClock> {
    store: S,
    prober: P,
    sink: N,
    clock: C,
    messages: MessageTemplates,
    probe_timeout: Duration,
}

impl<S, P, N> SweepRunner<S, P, N, SystemClock> {
    /// Creates a runner with the system clock and default messages.
    #[must_use]
    pub fn new(store: S, prober: P, sink: N, probe_timeout: Duration) -> Self {
        Self {
            store,
            prober,
            sink,
            clock: SystemClock,
            messages: MessageTemplates::default(),
            probe_timeout,
        }
    }
}

impl<S, P, N, C> SweepRunner<S, P, N, C> {
    /// Replaces the clock, mainly for tests.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> SweepRunner<S, P, N, C2> {
        SweepRunner {
            store: self.store,
            prober: self.prober,
            sink: self.sink,
            clock,
            messages: self.messages,
            probe_timeout: self.probe_timeout,
        }
    }

    /// Sets the notification texts.
    #[must_use]
    pub fn with_messages(mut self, messages: MessageTemplates) -> Self {
        self.messages = messages;
        self
    }

    /// Returns the configured probe timeout.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying prober.
    #[must_use]
    pub const fn prober(&self) -> &P {
        &self.prober
    }

    /// Returns the underlying sink.
    #[must_use]
    pub const fn sink(&self) -> &N {
        &self.sink
    }
}

impl<S, P, N, C> SweepRunner<S, P, N, C>
where
    S: SiteStore,
    P: Prober,
    N: NotificationSink,
    C: Clock,
{
    /// Executes one sweep.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Store`] if the site list cannot be fetched. In
    /// that case no site is probed and nobody is notified. Failures after
    /// that point are per site and end up in [`SweepReport::errors`].
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        let sites = self.store.list_all().await?;
        tracing::info!("Sweep started over {} site(s)", sites.len());

        let mut report = SweepReport::default();
        for site in &sites {
            self.check_site(site, &mut report).await;
        }

        tracing::info!(
            "Sweep finished: {} checked, {} notified, {} error(s)",
            report.checked,
            report.notified,
            report.errors.len()
        );
        Ok(report)
    }

    /// Probe, evaluate, persist and notify for one site.
    ///
    /// Persisting and notifying are independent: a failed write is recorded
    /// and the owner is still told about the transition.
    async fn check_site(&self, site: &Site, report: &mut SweepReport) {
        let reachable = self.prober.probe(&site.url, self.probe_timeout).await;
        report.checked += 1;

        let evaluation = evaluate(site.status, reachable);
        tracing::debug!(
            "Site {} ({}): {} -> {}",
            site.id,
            site.url,
            site.status,
            evaluation.status
        );

        let update = StatusUpdate {
            status: evaluation.status,
            last_checked_at: self.clock.now(),
        };
        if let Err(e) = self.store.update(site.id, update).await {
            tracing::error!("Failed to persist status of site {}: {e}", site.id);
            report
                .errors
                .push(SiteFailure::new(site, SiteError::Persist(e)));
        }

        let Some(transition) = evaluation.transition else {
            return;
        };

        match self.announce(site, transition).await {
            Ok(()) => {
                tracing::info!(
                    "Notified {} that {} is {}",
                    site.owner_id,
                    site.url,
                    evaluation.status
                );
                report.notified += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to notify {} about site {}: {e}",
                    site.owner_id,
                    site.id
                );
                report
                    .errors
                    .push(SiteFailure::new(site, SiteError::Delivery(e)));
            }
        }
    }

    async fn announce(&self, site: &Site, transition: Transition) -> Result<(), DeliveryError> {
        let text = self.messages.render(transition, site)?;
        self.sink.notify(&site.owner_id, &text).await
    }
}
