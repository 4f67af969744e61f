//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong on the wire. Callers decide what a failure
/// means: the prober folds every variant into "unreachable", the Telegram
/// sink reports it as a delivery failure.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, refused connections, TLS
    /// errors and responses that could not be read.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (bad URL, bad header, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
