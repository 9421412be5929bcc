//! Single-shot rebilling operations behind the interactive menu.
//!
//! Every operation is one or a few provider calls with no local state beyond
//! the returned record. Batch operations keep the per-row
//! catch-and-continue policy of the batch charger.

use chrono::{DateTime, Utc};

use rebill_core::{
    BillingProvider, ChargeRequest, Invoice, Payment, PaymentMethodKind, ProviderError,
    Subscription,
};

/// A customer with its computed payment-method flag.
#[derive(Debug, Clone)]
pub struct CustomerOverview {
    /// Provider customer ID.
    pub customer_id: String,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Whether at least one card-type method is on file. A simplified check:
    /// Link-backed cards are not excluded here, unlike batch screening.
    pub has_payment_method: bool,
    /// When the customer was created.
    pub created: DateTime<Utc>,
    /// Free-form description.
    pub description: String,
}

/// A failed invoice awaiting a manual retry.
#[derive(Debug, Clone)]
pub struct FailedInvoice {
    /// Provider invoice ID.
    pub invoice_id: String,
    /// Owning customer, when the provider reports one.
    pub customer_id: Option<String>,
    /// Amount still owed, minor units.
    pub amount_cents: i64,
    /// Collection attempts so far.
    pub attempt_count: i64,
    /// When the invoice was created.
    pub created: DateTime<Utc>,
}

/// A successful row in a batch rebill.
#[derive(Debug, Clone)]
pub struct RebillSuccess {
    /// Customer charged.
    pub customer_id: String,
    /// Provider payment ID.
    pub payment_id: String,
    /// Amount charged, minor units.
    pub amount_cents: i64,
}

/// A failed row in a batch rebill.
#[derive(Debug, Clone)]
pub struct RebillFailure {
    /// Customer that failed.
    pub customer_id: String,
    /// The provider's error message.
    pub error: String,
}

/// Outcome of a batch rebill over an explicit customer list.
#[derive(Debug, Default)]
pub struct RebillOutcome {
    /// Rows that charged.
    pub successful: Vec<RebillSuccess>,
    /// Rows that failed.
    pub failed: Vec<RebillFailure>,
    /// Rows attempted.
    pub total: usize,
}

/// A successful invoice retry.
#[derive(Debug, Clone)]
pub struct RetrySuccess {
    /// Invoice paid.
    pub invoice_id: String,
    /// Owning customer.
    pub customer_id: Option<String>,
    /// Amount that was due, minor units.
    pub amount_cents: i64,
}

/// A failed invoice retry.
#[derive(Debug, Clone)]
pub struct RetryFailure {
    /// Invoice that stayed unpaid.
    pub invoice_id: String,
    /// Owning customer.
    pub customer_id: Option<String>,
    /// The provider's error message.
    pub error: String,
}

/// Outcome of retrying every failed invoice.
#[derive(Debug, Default)]
pub struct RetryOutcome {
    /// Invoices that paid.
    pub successful: Vec<RetrySuccess>,
    /// Invoices that stayed unpaid.
    pub failed: Vec<RetryFailure>,
    /// Invoices attempted.
    pub total: usize,
}

/// Dispatches discrete rebilling operations against a provider.
pub struct Rebiller<'a> {
    provider: &'a dyn BillingProvider,
}

impl<'a> Rebiller<'a> {
    /// Create a rebiller over a provider.
    #[must_use]
    pub fn new(provider: &'a dyn BillingProvider) -> Self {
        Self { provider }
    }

    /// Create a subscription for a customer and price.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the subscription is rejected.
    pub async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProviderError> {
        let subscription = self
            .provider
            .create_subscription(customer_id, price_id)
            .await?;
        tracing::info!(customer = %customer_id, subscription = %subscription.id, "subscription created");
        Ok(subscription)
    }

    /// Issue a single one-off charge, letting the provider pick from the
    /// customer's automatic payment methods.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the charge is rejected.
    pub async fn charge_customer(
        &self,
        customer_id: &str,
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> Result<Payment, ProviderError> {
        let payment = self
            .provider
            .create_payment(&ChargeRequest {
                customer: customer_id.to_string(),
                payment_method: None,
                amount_cents,
                currency: currency.to_string(),
                description: description.to_string(),
            })
            .await?;
        tracing::info!(customer = %customer_id, payment = %payment.id, amount_cents, "charge created");
        Ok(payment)
    }

    /// List every customer with a computed has-payment-method flag.
    ///
    /// # Errors
    ///
    /// Returns an error if any listing call fails.
    pub async fn customers_overview(&self) -> Result<Vec<CustomerOverview>, ProviderError> {
        let customers = self.provider.list_customers().await?;

        let mut overview = Vec::with_capacity(customers.len());
        for customer in customers {
            let cards = self
                .provider
                .list_payment_methods(&customer.id, Some(PaymentMethodKind::Card))
                .await?;

            overview.push(CustomerOverview {
                customer_id: customer.id.clone(),
                name: customer.display_name().to_string(),
                email: customer.display_email().to_string(),
                has_payment_method: !cards.is_empty(),
                created: customer.created_at(),
                description: customer.description.clone().unwrap_or_default(),
            });
        }

        tracing::info!(count = overview.len(), "customers listed");
        Ok(overview)
    }

    /// List active subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing call fails.
    pub async fn active_subscriptions(&self) -> Result<Vec<Subscription>, ProviderError> {
        let subscriptions = self.provider.list_active_subscriptions().await?;
        tracing::info!(count = subscriptions.len(), "active subscriptions listed");
        Ok(subscriptions)
    }

    /// List open invoices that were attempted and remain unpaid.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing call fails.
    pub async fn failed_invoices(&self) -> Result<Vec<FailedInvoice>, ProviderError> {
        let invoices = self.provider.list_open_invoices().await?;

        let failed: Vec<FailedInvoice> = invoices
            .iter()
            .filter(|invoice| invoice.needs_retry())
            .map(|invoice| FailedInvoice {
                invoice_id: invoice.id.clone(),
                customer_id: invoice.customer.clone(),
                amount_cents: invoice.amount_due,
                attempt_count: invoice.attempt_count,
                created: invoice.created_at(),
            })
            .collect();

        tracing::info!(count = failed.len(), "failed invoices found");
        Ok(failed)
    }

    /// Retry payment of one invoice.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the payment attempt fails.
    pub async fn retry_invoice(&self, invoice_id: &str) -> Result<Invoice, ProviderError> {
        let invoice = self.provider.pay_invoice(invoice_id).await?;
        tracing::info!(invoice = %invoice.id, "invoice payment retried");
        Ok(invoice)
    }

    /// Retry every failed invoice, continue-on-error per invoice.
    ///
    /// # Errors
    ///
    /// Returns an error only if the initial invoice listing fails; individual
    /// retry failures land in the outcome's failed list.
    pub async fn retry_all_failed(&self) -> Result<RetryOutcome, ProviderError> {
        let invoices = self.failed_invoices().await?;

        let mut outcome = RetryOutcome {
            total: invoices.len(),
            ..RetryOutcome::default()
        };

        for invoice in invoices {
            match self.provider.pay_invoice(&invoice.invoice_id).await {
                Ok(paid) => outcome.successful.push(RetrySuccess {
                    invoice_id: paid.id,
                    customer_id: invoice.customer_id,
                    amount_cents: invoice.amount_cents,
                }),
                Err(error) => outcome.failed.push(RetryFailure {
                    invoice_id: invoice.invoice_id,
                    customer_id: invoice.customer_id,
                    error: error.to_string(),
                }),
            }
        }

        tracing::info!(
            successful = outcome.successful.len(),
            failed = outcome.failed.len(),
            "failed payment retry complete"
        );
        Ok(outcome)
    }

    /// Charge an explicit list of customer ids, continue-on-error per row.
    pub async fn batch_rebill(
        &self,
        customer_ids: &[String],
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> RebillOutcome {
        let mut outcome = RebillOutcome {
            total: customer_ids.len(),
            ..RebillOutcome::default()
        };

        for customer_id in customer_ids {
            match self
                .charge_customer(customer_id, amount_cents, currency, description)
                .await
            {
                Ok(payment) => outcome.successful.push(RebillSuccess {
                    customer_id: customer_id.clone(),
                    payment_id: payment.id,
                    amount_cents,
                }),
                Err(error) => outcome.failed.push(RebillFailure {
                    customer_id: customer_id.clone(),
                    error: error.to_string(),
                }),
            }
        }

        tracing::info!(
            successful = outcome.successful.len(),
            failed = outcome.failed.len(),
            "batch rebilling complete"
        );
        outcome
    }
}
