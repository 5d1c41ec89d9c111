//! Error taxonomy for the terminal runtime.
//!
//! Validation and precondition failures are raised before any network call;
//! API and network failures carry a message the presenter can show as-is.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosError {
    /// Malformed or out-of-range local input. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// A business-rule gate refused the operation (closed session, empty cart).
    #[error("{0}")]
    Precondition(String),

    /// The backend rejected the request with a non-success status.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// The call never completed (connect failure, timeout, bad URL).
    #[error("{0}")]
    Network(String),

    /// The backend answered with a body we could not decode.
    #[error("invalid response from backend: {0}")]
    Decode(String),
}

impl PosError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PosError::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        PosError::Precondition(msg.into())
    }

    /// True when the error was raised locally, before any request was issued.
    pub fn is_local(&self) -> bool {
        matches!(self, PosError::Validation(_) | PosError::Precondition(_))
    }
}
