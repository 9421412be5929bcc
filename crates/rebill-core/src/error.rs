//! Error type shared across billing providers.

/// Errors surfaced by a [`crate::BillingProvider`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider's API rejected the call.
    #[error("{kind}: {message}")]
    Api {
        /// Provider error type (`card_error`, `invalid_request_error`, ...).
        kind: String,
        /// Human-readable message, shown to the operator for failed rows.
        message: String,
        /// Provider error code, when present.
        code: Option<String>,
    },

    /// The HTTP round-trip itself failed.
    #[error("http error: {0}")]
    Http(String),

    /// The provider's response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The provider was called with missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
