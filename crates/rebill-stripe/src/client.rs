//! Stripe API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use rebill_core::{
    BillingProvider, ChargeRequest, Customer, Invoice, Payment, PaymentMethod, PaymentMethodKind,
    ProviderError, Subscription,
};

use crate::error::StripeError;

/// Page size for cursor walks over list endpoints.
const PAGE_LIMIT: &str = "100";

/// Stripe list response wrapper.
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

/// Stripe error envelope.
#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(rename = "type", default)]
    error_type: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StripeClient {
    /// Stripe API base URL.
    const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, Self::BASE_URL)
    }

    /// Create a client against a non-default base URL. Used by tests to point
    /// at a mock server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch every customer on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, StripeError> {
        self.list_all("customers", &[], |customer: &Customer| &customer.id)
            .await
    }

    /// Fetch a single customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects the ID.
    pub async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, StripeError> {
        let response = self
            .client
            .get(format!("{}/customers/{customer_id}", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List a customer's payment methods, optionally restricted to one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_payment_methods(
        &self,
        customer_id: &str,
        kind: Option<PaymentMethodKind>,
    ) -> Result<Vec<PaymentMethod>, StripeError> {
        let mut query = vec![("customer", customer_id.to_string())];
        if let Some(kind) = kind {
            query.push(("type", kind.as_str().to_string()));
        }

        self.list_all("payment_methods", &query, |method: &PaymentMethod| {
            &method.id
        })
        .await
    }

    /// Fetch a single payment method by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects the ID.
    pub async fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, StripeError> {
        let response = self
            .client
            .get(format!(
                "{}/payment_methods/{payment_method_id}",
                self.base_url
            ))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a payment intent for a charge request.
    ///
    /// With a named payment method the intent is confirmed immediately as a
    /// card-only, off-session payment. Without one, Stripe picks from the
    /// customer's automatic payment methods and the intent is left for the
    /// provider to advance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the charge is declined.
    pub async fn create_payment_intent(
        &self,
        request: &ChargeRequest,
    ) -> Result<Payment, StripeError> {
        let mut params = vec![
            ("amount", request.amount_cents.to_string()),
            ("currency", request.currency.clone()),
            ("customer", request.customer.clone()),
            ("description", request.description.clone()),
        ];

        if let Some(payment_method) = &request.payment_method {
            params.push(("payment_method", payment_method.clone()));
            params.push(("confirm", "true".to_string()));
            params.push(("off_session", "true".to_string()));
            params.push(("payment_method_types[]", "card".to_string()));
        } else {
            params.push(("automatic_payment_methods[enabled]", "true".to_string()));
        }

        tracing::debug!(
            customer = %request.customer,
            amount_cents = %request.amount_cents,
            confirmed = %request.payment_method.is_some(),
            "Creating payment intent"
        );

        let response = self
            .client
            .post(format!("{}/payment_intents", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a charge through the legacy Sources API, keyed only by the
    /// customer's default source.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the charge is declined.
    pub async fn create_charge(
        &self,
        customer_id: &str,
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> Result<Payment, StripeError> {
        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", currency.to_string()),
            ("customer", customer_id.to_string()),
            ("description", description.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/charges", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a subscription for a customer and price.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it.
    pub async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, StripeError> {
        let params = [
            ("customer", customer_id.to_string()),
            ("items[0][price]", price_id.to_string()),
            ("payment_behavior", "default_incomplete".to_string()),
            ("expand[]", "latest_invoice.payment_intent".to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/subscriptions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all active subscriptions on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_active_subscriptions(&self) -> Result<Vec<Subscription>, StripeError> {
        let query = [("status", "active".to_string())];
        self.list_all("subscriptions", &query, |sub: &Subscription| &sub.id)
            .await
    }

    /// List all open invoices on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_open_invoices(&self) -> Result<Vec<Invoice>, StripeError> {
        let query = [("status", "open".to_string())];
        self.list_all("invoices", &query, |invoice: &Invoice| &invoice.id)
            .await
    }

    /// Attempt payment of an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payment is declined.
    pub async fn pay_invoice(&self, invoice_id: &str) -> Result<Invoice, StripeError> {
        let params: [(&str, &str); 0] = [];

        let response = self
            .client
            .post(format!("{}/invoices/{invoice_id}/pay", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Walk a list endpoint with the sequential `starting_after` cursor until
    /// Stripe reports no more pages.
    async fn list_all<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        id_of: impl Fn(&T) -> &str,
    ) -> Result<Vec<T>, StripeError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut items: Vec<T> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/{path}", self.base_url))
                .basic_auth(&self.api_key, Option::<&str>::None)
                .query(&[("limit", PAGE_LIMIT)])
                .query(query);

            if let Some(after) = &cursor {
                request = request.query(&[("starting_after", after.as_str())]);
            }

            let page: Page<T> = self.handle_response(request.send().await?).await?;
            let has_more = page.has_more;
            cursor = page.data.last().map(|item| id_of(item).to_string());
            items.extend(page.data);

            if !has_more || cursor.is_none() {
                break;
            }
        }

        Ok(items)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn list_customers(&self) -> Result<Vec<Customer>, ProviderError> {
        StripeClient::list_customers(self).await.map_err(Into::into)
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, ProviderError> {
        StripeClient::retrieve_customer(self, customer_id)
            .await
            .map_err(Into::into)
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
        kind: Option<PaymentMethodKind>,
    ) -> Result<Vec<PaymentMethod>, ProviderError> {
        StripeClient::list_payment_methods(self, customer_id, kind)
            .await
            .map_err(Into::into)
    }

    async fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, ProviderError> {
        StripeClient::retrieve_payment_method(self, payment_method_id)
            .await
            .map_err(Into::into)
    }

    async fn create_payment(&self, request: &ChargeRequest) -> Result<Payment, ProviderError> {
        self.create_payment_intent(request).await.map_err(Into::into)
    }

    async fn create_legacy_charge(
        &self,
        customer_id: &str,
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> Result<Payment, ProviderError> {
        self.create_charge(customer_id, amount_cents, currency, description)
            .await
            .map_err(Into::into)
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProviderError> {
        StripeClient::create_subscription(self, customer_id, price_id)
            .await
            .map_err(Into::into)
    }

    async fn list_active_subscriptions(&self) -> Result<Vec<Subscription>, ProviderError> {
        StripeClient::list_active_subscriptions(self)
            .await
            .map_err(Into::into)
    }

    async fn list_open_invoices(&self) -> Result<Vec<Invoice>, ProviderError> {
        StripeClient::list_open_invoices(self)
            .await
            .map_err(Into::into)
    }

    async fn pay_invoice(&self, invoice_id: &str) -> Result<Invoice, ProviderError> {
        StripeClient::pay_invoice(self, invoice_id)
            .await
            .map_err(Into::into)
    }
}
