//! Customer and payment-method objects as the provider returns them.
//!
//! These are transient views over the provider's JSON. Nothing here is
//! persisted; the provider remains the source of truth.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A customer record fetched from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Provider customer ID (`cus_...`).
    pub id: String,

    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,

    /// Customer display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Legacy default source reference (older Sources API).
    #[serde(default)]
    pub default_source: Option<String>,

    /// Invoice settings, which may name a default payment method.
    #[serde(default)]
    pub invoice_settings: Option<InvoiceSettings>,

    /// Created timestamp (Unix seconds).
    #[serde(default)]
    pub created: i64,
}

impl Customer {
    /// Display name, with the placeholder the operator scripts print for
    /// customers that have none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("No name")
    }

    /// Email, or its placeholder.
    #[must_use]
    pub fn display_email(&self) -> &str {
        self.email.as_deref().unwrap_or("No email")
    }

    /// The payment-method ID named by invoice settings, if any.
    #[must_use]
    pub fn invoice_default_payment_method(&self) -> Option<&str> {
        self.invoice_settings
            .as_ref()
            .and_then(|s| s.default_payment_method.as_deref())
    }

    /// Creation time as a UTC datetime (epoch on an out-of-range timestamp).
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.created, 0).unwrap_or_default()
    }
}

/// The `invoice_settings` object attached to a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceSettings {
    /// Default payment method ID (`pm_...`), if one is set.
    #[serde(default)]
    pub default_payment_method: Option<String>,
}

/// Payment-method type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    /// A card on file.
    Card,
    /// Stripe Link.
    Link,
    /// Google Pay wallet.
    GooglePay,
    /// Apple Pay wallet.
    ApplePay,
    /// Anything else the provider may return.
    #[serde(other)]
    Other,
}

impl PaymentMethodKind {
    /// The provider's wire name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Link => "link",
            Self::GooglePay => "google_pay",
            Self::ApplePay => "apple_pay",
            Self::Other => "other",
        }
    }
}

/// A tokenized payment method held by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    /// Provider payment-method ID (`pm_...`).
    pub id: String,

    /// Type tag.
    #[serde(rename = "type")]
    pub kind: PaymentMethodKind,

    /// Populated when the method is Link-backed. A card carrying this marker
    /// is charged through Link, not as a regular card.
    #[serde(default)]
    pub link: Option<serde_json::Value>,
}

impl PaymentMethod {
    /// True for a plain card that is not Link-backed. Link, Google Pay and
    /// Apple Pay methods are never regular cards.
    #[must_use]
    pub fn is_regular_card(&self) -> bool {
        self.kind == PaymentMethodKind::Card && self.link.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_deserializes_from_provider_json() {
        let customer: Customer = serde_json::from_str(
            r#"{
                "id": "cus_123",
                "object": "customer",
                "email": "a@example.com",
                "name": null,
                "default_source": "card_456",
                "invoice_settings": {"default_payment_method": "pm_789"},
                "created": 1700000000
            }"#,
        )
        .unwrap();

        assert_eq!(customer.id, "cus_123");
        assert_eq!(customer.display_name(), "No name");
        assert_eq!(customer.display_email(), "a@example.com");
        assert_eq!(customer.default_source.as_deref(), Some("card_456"));
        assert_eq!(customer.invoice_default_payment_method(), Some("pm_789"));
    }

    #[test]
    fn unknown_method_kind_maps_to_other() {
        let method: PaymentMethod =
            serde_json::from_str(r#"{"id": "pm_x", "type": "us_bank_account"}"#).unwrap();
        assert_eq!(method.kind, PaymentMethodKind::Other);
        assert!(!method.is_regular_card());
    }

    #[test]
    fn link_backed_card_is_not_regular() {
        let method: PaymentMethod = serde_json::from_str(
            r#"{"id": "pm_x", "type": "card", "link": {"persistent_token": "tok"}}"#,
        )
        .unwrap();
        assert_eq!(method.kind, PaymentMethodKind::Card);
        assert!(!method.is_regular_card());
    }

    #[test]
    fn plain_card_is_regular() {
        let method: PaymentMethod =
            serde_json::from_str(r#"{"id": "pm_x", "type": "card"}"#).unwrap();
        assert!(method.is_regular_card());
    }
}
