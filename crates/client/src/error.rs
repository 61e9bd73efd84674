//! Client error types.

use thiserror::Error;

/// Errors surfaced by the client engine.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server responded with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Guest storage read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored guest state could not be decoded.
    #[error("corrupt guest state: {0}")]
    CorruptState(#[from] serde_json::Error),

    /// Checkout requires a non-empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Operation is not valid in the checkout's current state.
    #[error("invalid checkout state: {0}")]
    InvalidCheckoutState(&'static str),
}
