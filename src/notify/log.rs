//! Log-only sink used in dry-run mode.

use crate::site::OwnerId;

use super::{DeliveryError, NotificationSink};

/// Sink that writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    async fn notify(&self, owner: &OwnerId, text: &str) -> Result<(), DeliveryError> {
        tracing::info!("Dry-run: would notify {owner}: {text}");
        Ok(())
    }
}
