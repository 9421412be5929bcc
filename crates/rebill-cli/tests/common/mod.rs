//! In-memory billing provider for tests. No network dependency.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use rebill_core::{
    BillingProvider, ChargeRequest, Customer, Invoice, Payment, PaymentMethod, PaymentMethodKind,
    ProviderError, Subscription,
};

/// Build a customer from a base record merged with `extra` fields.
pub fn customer(id: &str, extra: Value) -> Customer {
    let mut base = json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "name": format!("Name {id}"),
        "created": 1_700_000_000
    });
    if let (Some(base_map), Some(extra_map)) = (base.as_object_mut(), extra.as_object()) {
        for (key, value) in extra_map {
            base_map.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).unwrap()
}

pub fn method(value: Value) -> PaymentMethod {
    serde_json::from_value(value).unwrap()
}

pub fn invoice(value: Value) -> Invoice {
    serde_json::from_value(value).unwrap()
}

fn declined() -> ProviderError {
    ProviderError::Api {
        kind: "card_error".into(),
        message: "Your card was declined.".into(),
        code: Some("card_declined".into()),
    }
}

fn missing(what: &str) -> ProviderError {
    ProviderError::Api {
        kind: "invalid_request_error".into(),
        message: format!("No such resource: {what}"),
        code: Some("resource_missing".into()),
    }
}

fn unavailable() -> ProviderError {
    ProviderError::Api {
        kind: "api_error".into(),
        message: "Temporarily unavailable.".into(),
        code: None,
    }
}

/// Scripted provider: fixed data in, recorded calls out.
#[derive(Default)]
pub struct FakeProvider {
    pub customers: Vec<Customer>,
    /// Payment methods as (owning customer id, method). An empty owner id
    /// makes a method retrievable but not listed for any customer.
    pub methods: Vec<(String, PaymentMethod)>,
    pub invoices: Vec<Invoice>,
    pub subscriptions: Vec<Subscription>,
    /// Customer ids whose payment-method listings error.
    pub fail_method_listings: HashSet<String>,
    /// Customer ids whose charges are declined.
    pub fail_charges: HashSet<String>,
    /// Invoice ids whose payment retries are declined.
    pub fail_invoices: HashSet<String>,
    /// Recorded payment-intent requests.
    pub payments: Mutex<Vec<ChargeRequest>>,
    /// Recorded legacy charges, by customer id.
    pub legacy_charges: Mutex<Vec<String>>,
    /// Recorded successful invoice payments, by invoice id.
    pub paid_invoices: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.push(customer);
        self
    }

    pub fn with_method(mut self, owner: &str, method: PaymentMethod) -> Self {
        self.methods.push((owner.to_string(), method));
        self
    }

    pub fn with_invoice(mut self, invoice: Invoice) -> Self {
        self.invoices.push(invoice);
        self
    }

    pub fn failing_method_listing(mut self, customer_id: &str) -> Self {
        self.fail_method_listings.insert(customer_id.to_string());
        self
    }

    pub fn failing_charge(mut self, customer_id: &str) -> Self {
        self.fail_charges.insert(customer_id.to_string());
        self
    }

    pub fn failing_invoice(mut self, invoice_id: &str) -> Self {
        self.fail_invoices.insert(invoice_id.to_string());
        self
    }
}

#[async_trait]
impl BillingProvider for FakeProvider {
    async fn list_customers(&self) -> Result<Vec<Customer>, ProviderError> {
        Ok(self.customers.clone())
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, ProviderError> {
        self.customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned()
            .ok_or_else(|| missing(customer_id))
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
        kind: Option<PaymentMethodKind>,
    ) -> Result<Vec<PaymentMethod>, ProviderError> {
        if self.fail_method_listings.contains(customer_id) {
            return Err(unavailable());
        }
        Ok(self
            .methods
            .iter()
            .filter(|(owner, m)| owner == customer_id && kind.map_or(true, |k| m.kind == k))
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, ProviderError> {
        self.methods
            .iter()
            .find(|(_, m)| m.id == payment_method_id)
            .map(|(_, m)| m.clone())
            .ok_or_else(|| missing(payment_method_id))
    }

    async fn create_payment(&self, request: &ChargeRequest) -> Result<Payment, ProviderError> {
        if self.fail_charges.contains(&request.customer) {
            return Err(declined());
        }
        self.payments.lock().unwrap().push(request.clone());
        Ok(Payment {
            id: format!("pi_{}", request.customer),
            status: "succeeded".into(),
            amount: request.amount_cents,
        })
    }

    async fn create_legacy_charge(
        &self,
        customer_id: &str,
        amount_cents: i64,
        _currency: &str,
        _description: &str,
    ) -> Result<Payment, ProviderError> {
        if self.fail_charges.contains(customer_id) {
            return Err(declined());
        }
        self.legacy_charges.lock().unwrap().push(customer_id.to_string());
        Ok(Payment {
            id: format!("ch_{customer_id}"),
            status: "succeeded".into(),
            amount: amount_cents,
        })
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProviderError> {
        Ok(serde_json::from_value(json!({
            "id": "sub_new",
            "customer": customer_id,
            "status": "incomplete",
            "current_period_end": 1_700_000_000,
            "items": {"data": [{"price": {"id": price_id, "unit_amount": 2999}}]}
        }))
        .unwrap())
    }

    async fn list_active_subscriptions(&self) -> Result<Vec<Subscription>, ProviderError> {
        Ok(self.subscriptions.clone())
    }

    async fn list_open_invoices(&self) -> Result<Vec<Invoice>, ProviderError> {
        Ok(self.invoices.clone())
    }

    async fn pay_invoice(&self, invoice_id: &str) -> Result<Invoice, ProviderError> {
        if self.fail_invoices.contains(invoice_id) {
            return Err(declined());
        }
        let mut paid = self
            .invoices
            .iter()
            .find(|i| i.id == invoice_id)
            .cloned()
            .ok_or_else(|| missing(invoice_id))?;
        paid.paid = true;
        paid.status = Some("paid".into());
        paid.amount_paid = paid.amount_due;
        paid.amount_due = 0;
        self.paid_invoices.lock().unwrap().push(invoice_id.to_string());
        Ok(paid)
    }
}
