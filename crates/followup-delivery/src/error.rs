//! Delivery error types.

use thiserror::Error;

/// Errors from one follow-up delivery attempt.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Platform answered with a non-success status.
    #[error("Follow-up rejected with status {0}")]
    Status(u16),
}

/// Result type alias using DeliveryError.
pub type DeliveryResult<T> = Result<T, DeliveryError>;
