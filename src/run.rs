//! Application execution logic.
//!
//! This module wires the store, prober and notification sink together and
//! runs the selected command: a single sweep, the watch loop, or one of the
//! site management commands.

use std::time::{Duration, SystemTime};

use http::StatusCode;
use thiserror::Error;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

use itsalive::config::{Command, ValidatedConfig};
use itsalive::http::ReqwestClient;
use itsalive::monitor::{SweepRunner, Trigger, TriggerResponse};
use itsalive::notify::{DeliveryError, LogSink, NotificationSink, TelegramSink};
use itsalive::probe::HttpProber;
use itsalive::site::{NewSite, OwnerId, Site, SiteId, SiteUrlError};
use itsalive::store::{FileSiteStore, SiteStore, StoreError};
use itsalive::time::{SystemClock, rfc3339};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Type alias for the application's sweep trigger.
type AppTrigger = Trigger<FileSiteStore, HttpProber<ReqwestClient>, AppSink, SystemClock>;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The site store could not be read or written.
    #[error("Site store error: {0}")]
    Store(#[from] StoreError),

    /// The URL given to `add` is not a valid site URL.
    #[error("Invalid site URL: {0}")]
    InvalidSite(#[from] SiteUrlError),

    /// `remove` was given an id that is not tracked.
    #[error("No site with id {0}")]
    UnknownSite(SiteId),

    /// The Telegram endpoint could not be built from the API base.
    #[error("Invalid Telegram endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The sweep summary could not be serialized.
    #[error("Failed to serialize sweep summary: {0}")]
    Summary(#[from] serde_json::Error),

    /// A one-shot sweep did not complete.
    #[error("Sweep failed with status {0}")]
    SweepFailed(StatusCode),
}

/// Notification sink selected at startup.
#[derive(Debug)]
enum AppSink {
    /// Log notifications only (`--dry-run`).
    DryRun(LogSink),
    /// Deliver through the Telegram Bot API.
    Telegram(TelegramSink<ReqwestClient>),
}

impl NotificationSink for AppSink {
    async fn notify(&self, owner: &OwnerId, text: &str) -> Result<(), DeliveryError> {
        match self {
            Self::DryRun(sink) => sink.notify(owner, text).await,
            Self::Telegram(sink) => sink.notify(owner, text).await,
        }
    }
}

/// Executes the selected command.
///
/// Without a subcommand the watch loop runs with the configured interval.
///
/// # Errors
///
/// Returns an error if the store cannot be used, the command input is
/// invalid, or a one-shot sweep does not complete.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires network
/// access and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(command: Option<Command>, config: ValidatedConfig) -> Result<(), RunError> {
    let store = FileSiteStore::new(config.store_path.clone());
    tracing::debug!("Using site store {}", store.path().display());

    match command {
        None | Some(Command::Watch { .. }) => {
            let interval = config.interval;
            let trigger = create_trigger(store, config)?;
            run_watch_loop(&trigger, interval).await;
            Ok(())
        }
        Some(Command::Sweep) => {
            let trigger = create_trigger(store, config)?;
            run_single_sweep(&trigger).await
        }
        Some(Command::Add { owner, url }) => {
            let new_site = NewSite::parse(OwnerId::new(owner), &url)?;
            let site = store.register(new_site).await?;
            println!("{}", format_confirmation(&site));
            Ok(())
        }
        Some(Command::List { owner }) => {
            let sites = match owner {
                Some(owner) => store.list_for_owner(&OwnerId::new(owner)).await?,
                None => store.list_all().await?,
            };
            print!("{}", format_site_list(&sites));
            Ok(())
        }
        Some(Command::Remove { id }) => {
            let id = SiteId(id);
            if !store.remove(id).await? {
                return Err(RunError::UnknownSite(id));
            }
            println!("Stopped tracking site {id}");
            Ok(())
        }
        // Handled before the configuration is loaded.
        Some(Command::Init { .. }) => Ok(()),
    }
}

/// Creates the sweep trigger from configuration.
fn create_trigger(store: FileSiteStore, config: ValidatedConfig) -> Result<AppTrigger, RunError> {
    let sink = create_sink(&config)?;
    let prober = HttpProber::new(ReqwestClient::new());

    let runner = SweepRunner::new(store, prober, sink, config.probe_timeout)
        .with_messages(config.messages);

    Ok(Trigger::new(runner))
}

/// Chooses the notification sink: log-only in dry-run mode, Telegram otherwise.
///
/// Validation guarantees a Telegram configuration for sweeping commands
/// outside dry-run; without one notifications are logged.
fn create_sink(config: &ValidatedConfig) -> Result<AppSink, RunError> {
    match (&config.telegram, config.dry_run) {
        (Some(telegram), false) => {
            let sink = TelegramSink::new(
                ReqwestClient::new(),
                &telegram.api_base,
                &telegram.bot_token,
            )?;
            Ok(AppSink::Telegram(sink))
        }
        _ => {
            tracing::info!("Dry-run mode enabled - notifications will be logged but not sent");
            Ok(AppSink::DryRun(LogSink))
        }
    }
}

/// Runs one sweep and prints its JSON summary to stdout.
///
/// Excluded from coverage - requires network access.
#[cfg(not(tarpaulin_include))]
async fn run_single_sweep(trigger: &AppTrigger) -> Result<(), RunError> {
    let response = trigger.fire().await;
    println!("{}", serde_json::to_string_pretty(&response.summary)?);

    if response.is_success() {
        Ok(())
    } else {
        Err(RunError::SweepFailed(response.status))
    }
}

/// Runs a sweep on every tick until a shutdown signal arrives.
///
/// The first sweep starts immediately. Ticks missed while a sweep is still
/// running are skipped rather than queued.
///
/// Excluded from coverage - requires network access and signal handling.
#[cfg(not(tarpaulin_include))]
async fn run_watch_loop(trigger: &AppTrigger, interval: Duration) {
    tracing::info!("Watching sites every {}s", interval.as_secs());

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = IntervalStream::new(ticker);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return;
            }

            tick = ticks.next() => {
                if tick.is_none() {
                    return;
                }
                log_response(&trigger.fire().await);
            }
        }
    }
}

/// Logs the outcome of a sweep fired by the watch loop.
fn log_response(response: &TriggerResponse) {
    let summary = &response.summary;
    if response.is_success() {
        tracing::info!(
            "{}: {} checked, {} notified, {} error(s)",
            summary.message,
            summary.checked,
            summary.notified,
            summary.errors.len()
        );
        for failure in &summary.errors {
            tracing::warn!("Site {} ({}): {}", failure.site_id, failure.url, failure.error);
        }
    } else {
        tracing::error!("Sweep not completed ({}): {}", response.status, summary.message);
    }
}

/// Text printed after a site is registered.
fn format_confirmation(site: &Site) -> String {
    format!(
        "I will check for you if {} it's alive 🤓 (id {})",
        site.url, site.id
    )
}

/// Renders sites as one line each: id, URL, status emoji and last check.
fn format_site_list(sites: &[Site]) -> String {
    if sites.is_empty() {
        return "You are not tracking any website, use add to add the first one\n".to_string();
    }

    sites
        .iter()
        .map(|site| {
            format!(
                "{} {} {} (owner {}, last checked: {})\n",
                site.id,
                site.url,
                site.status.emoji(),
                site.owner_id,
                format_last_checked(site.last_checked_at)
            )
        })
        .collect()
}

fn format_last_checked(time: Option<SystemTime>) -> String {
    time.map_or_else(|| "never".to_string(), rfc3339)
}

/// Returns a future that completes when a shutdown signal is received.
///
/// A handler that cannot be installed is logged and never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
