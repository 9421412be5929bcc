//! Error type for Stripe operations.

use rebill_core::ProviderError;

/// Errors raised by the Stripe client.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<StripeError> for ProviderError {
    fn from(error: StripeError) -> Self {
        match error {
            StripeError::Http(e) if e.is_decode() => ProviderError::Decode(e.to_string()),
            StripeError::Http(e) => ProviderError::Http(e.to_string()),
            StripeError::Api {
                error_type,
                message,
                code,
            } => ProviderError::Api {
                kind: error_type,
                message,
                code,
            },
            StripeError::Configuration(message) => ProviderError::Configuration(message),
        }
    }
}
