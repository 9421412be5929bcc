//! Charge requests and their provider-side results.

use serde::Deserialize;

/// A request to charge one customer once.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Provider customer ID.
    pub customer: String,

    /// Payment method to charge. When set, the provider confirms a card-only,
    /// off-session payment against this method; when `None`, the provider
    /// picks from the customer's automatic payment methods.
    pub payment_method: Option<String>,

    /// Amount in minor currency units.
    pub amount_cents: i64,

    /// ISO currency code, lowercase (`usd`, `eur`, ...).
    pub currency: String,

    /// Statement/charge description.
    pub description: String,
}

/// The provider's record of a completed charge call, covering both payment
/// intents and legacy charges.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    /// Provider payment ID (`pi_...` or `ch_...`).
    pub id: String,

    /// Provider status string (`succeeded`, `requires_payment_method`, ...).
    #[serde(default)]
    pub status: String,

    /// Amount in minor currency units.
    #[serde(default)]
    pub amount: i64,
}
