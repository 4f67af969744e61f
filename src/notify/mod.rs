//! Delivery of status notifications to site owners.
//!
//! This module provides:
//! - The delivery seam ([`NotificationSink`], [`DeliveryError`])
//! - Telegram Bot API delivery ([`TelegramSink`])
//! - Log-only delivery for dry runs ([`LogSink`])
//! - Message rendering ([`MessageTemplates`])

mod error;
mod log;
mod message;
mod telegram;


pub use error::DeliveryError;
pub use log::LogSink;
pub use message::MessageTemplates;
pub use telegram::TelegramSink;

use crate::site::OwnerId;

/// Delivers a human-readable message to the owner of a site.
///
/// Failures are reported, never retried; a sweep records them and moves on.
pub trait NotificationSink: Send + Sync {
    /// Sends `text` to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the message could not be delivered.
    fn notify(
        &self,
        owner: &OwnerId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}
