//! Regular-card eligibility classification.
//!
//! A customer is batch-chargeable only through a regular card. Link, Google
//! Pay and Apple Pay methods are never eligible, wherever they sit in the
//! method list.

use crate::customer::{Customer, PaymentMethod};
use crate::provider::BillingProvider;

/// Result of the first, purely local classification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardCheck {
    /// The customer can be charged via a regular card.
    Eligible,
    /// Not decidable locally: invoice settings name a default payment method
    /// that must be fetched and inspected.
    ResolveInvoiceDefault(String),
    /// No regular card anywhere.
    Ineligible,
}

/// Classify a customer from already-fetched data. First match wins:
///
/// 1. any attached regular card method;
/// 2. a legacy `default_source` reference, assumed to be a card without
///    verifying its type, a known-loose heuristic kept from the operator
///    scripts this replaces;
/// 3. an invoice-settings default payment method, deferred to a fetch;
/// 4. otherwise ineligible.
///
/// Pure function of its inputs: reclassifying an unchanged record always
/// yields the same answer.
#[must_use]
pub fn classify(customer: &Customer, methods: &[PaymentMethod]) -> CardCheck {
    if methods.iter().any(PaymentMethod::is_regular_card) {
        return CardCheck::Eligible;
    }

    if customer.default_source.is_some() {
        return CardCheck::Eligible;
    }

    if let Some(pm_id) = customer.invoice_default_payment_method() {
        return CardCheck::ResolveInvoiceDefault(pm_id.to_string());
    }

    CardCheck::Ineligible
}

/// Full eligibility check against the provider.
///
/// Failing to list the customer's methods degrades to an empty list so the
/// remaining branches still apply; a failure fetching the invoice-settings
/// method makes only that branch ineligible.
pub async fn is_chargeable(provider: &dyn BillingProvider, customer: &Customer) -> bool {
    let methods = match provider.list_payment_methods(&customer.id, None).await {
        Ok(methods) => methods,
        Err(error) => {
            tracing::warn!(customer = %customer.id, %error, "payment method listing failed");
            Vec::new()
        }
    };

    match classify(customer, &methods) {
        CardCheck::Eligible => true,
        CardCheck::Ineligible => false,
        CardCheck::ResolveInvoiceDefault(pm_id) => {
            match provider.retrieve_payment_method(&pm_id).await {
                Ok(method) => method.is_regular_card(),
                Err(error) => {
                    tracing::debug!(customer = %customer.id, %error, "invoice default lookup failed");
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::InvoiceSettings;

    fn customer(default_source: Option<&str>, invoice_default: Option<&str>) -> Customer {
        Customer {
            id: "cus_1".into(),
            email: None,
            name: None,
            description: None,
            default_source: default_source.map(String::from),
            invoice_settings: invoice_default.map(|pm| InvoiceSettings {
                default_payment_method: Some(pm.to_string()),
            }),
            created: 0,
        }
    }

    fn method(json: &str) -> PaymentMethod {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn regular_card_wins() {
        let methods = vec![
            method(r#"{"id": "pm_link", "type": "link"}"#),
            method(r#"{"id": "pm_card", "type": "card"}"#),
        ];
        assert_eq!(classify(&customer(None, None), &methods), CardCheck::Eligible);
    }

    #[test]
    fn wallet_only_customers_are_ineligible() {
        let methods = vec![
            method(r#"{"id": "pm_1", "type": "link"}"#),
            method(r#"{"id": "pm_2", "type": "google_pay"}"#),
            method(r#"{"id": "pm_3", "type": "apple_pay"}"#),
        ];
        assert_eq!(
            classify(&customer(None, None), &methods),
            CardCheck::Ineligible
        );
    }

    #[test]
    fn link_backed_card_alone_is_ineligible() {
        let methods = vec![method(
            r#"{"id": "pm_1", "type": "card", "link": {"persistent_token": "t"}}"#,
        )];
        assert_eq!(
            classify(&customer(None, None), &methods),
            CardCheck::Ineligible
        );
    }

    #[test]
    fn legacy_default_source_is_assumed_eligible() {
        assert_eq!(
            classify(&customer(Some("card_1"), None), &[]),
            CardCheck::Eligible
        );
    }

    #[test]
    fn invoice_default_defers_to_a_fetch() {
        assert_eq!(
            classify(&customer(None, Some("pm_9")), &[]),
            CardCheck::ResolveInvoiceDefault("pm_9".into())
        );
    }

    #[test]
    fn nothing_on_file_is_ineligible() {
        assert_eq!(classify(&customer(None, None), &[]), CardCheck::Ineligible);
    }

    #[test]
    fn classification_is_idempotent() {
        let cust = customer(None, Some("pm_9"));
        let methods = vec![method(r#"{"id": "pm_1", "type": "link"}"#)];
        assert_eq!(classify(&cust, &methods), classify(&cust, &methods));
    }
}
