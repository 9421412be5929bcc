//! The capability seam over the hosted billing provider.

use async_trait::async_trait;

use crate::charge::{ChargeRequest, Payment};
use crate::customer::{Customer, PaymentMethod, PaymentMethodKind};
use crate::error::ProviderError;
use crate::invoice::Invoice;
use crate::subscription::Subscription;

/// The narrow set of provider calls the toolkit relies on.
///
/// Implementations own pagination: list methods return complete result sets,
/// walked with the provider's sequential cursor. Test suites substitute an
/// in-memory implementation so no operation needs the network.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Fetch every customer on the account.
    async fn list_customers(&self) -> Result<Vec<Customer>, ProviderError>;

    /// Fetch a single customer.
    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, ProviderError>;

    /// List a customer's payment methods, optionally restricted to one kind.
    async fn list_payment_methods(
        &self,
        customer_id: &str,
        kind: Option<PaymentMethodKind>,
    ) -> Result<Vec<PaymentMethod>, ProviderError>;

    /// Fetch a single payment method.
    async fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, ProviderError>;

    /// Create and (when a method is named) confirm a payment.
    async fn create_payment(&self, request: &ChargeRequest) -> Result<Payment, ProviderError>;

    /// Create a charge through the legacy Sources API, keyed only by customer.
    async fn create_legacy_charge(
        &self,
        customer_id: &str,
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> Result<Payment, ProviderError>;

    /// Create a subscription for a customer and price.
    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProviderError>;

    /// List all active subscriptions.
    async fn list_active_subscriptions(&self) -> Result<Vec<Subscription>, ProviderError>;

    /// List all open invoices.
    async fn list_open_invoices(&self) -> Result<Vec<Invoice>, ProviderError>;

    /// Attempt payment of an invoice.
    async fn pay_invoice(&self, invoice_id: &str) -> Result<Invoice, ProviderError>;
}
