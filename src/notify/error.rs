//! Error types for notification delivery.

use thiserror::Error;

use crate::http::HttpError;

/// A notification could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never got a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    /// The messaging API answered with a non-success status.
    #[error("Delivery rejected with status {status}: {}", .description.as_deref().unwrap_or("no description"))]
    Rejected {
        /// HTTP status returned by the API
        status: http::StatusCode,
        /// Error description reported by the API, if any
        description: Option<String>,
    },

    /// The message template could not be rendered.
    #[error("Failed to render message: {0}")]
    Template(String),
}
