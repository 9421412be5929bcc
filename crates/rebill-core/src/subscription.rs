//! Subscription objects, trimmed to what the interactive operations show.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A provider subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    /// Provider subscription ID (`sub_...`).
    pub id: String,

    /// Owning customer ID.
    #[serde(default)]
    pub customer: String,

    /// Subscription status (`active`, `incomplete`, `past_due`, ...).
    #[serde(default)]
    pub status: String,

    /// End of the current billing period (Unix seconds).
    #[serde(default)]
    pub current_period_end: i64,

    /// Subscription line items.
    #[serde(default)]
    pub items: SubscriptionItems,
}

/// List envelope for subscription items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionItems {
    /// The items themselves.
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

/// A single subscription line item.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    /// The price attached to this item.
    #[serde(default)]
    pub price: Option<Price>,
}

/// A price object, reduced to its unit amount.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Unit amount in minor currency units.
    #[serde(default)]
    pub unit_amount: Option<i64>,
}

impl Subscription {
    /// Unit amount of the first line item, zero when the subscription has no
    /// priced items.
    #[must_use]
    pub fn unit_amount_cents(&self) -> i64 {
        self.items
            .data
            .first()
            .and_then(|item| item.price.as_ref())
            .and_then(|price| price.unit_amount)
            .unwrap_or(0)
    }

    /// Next billing boundary as a UTC datetime.
    #[must_use]
    pub fn current_period_end_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.current_period_end, 0).unwrap_or_default()
    }
}
