//! Eligibility screening and the batch charge runner.
//!
//! The runner is deliberately continue-on-error: a provider failure for one
//! customer is recorded and the run moves on. Do not upgrade this to an
//! all-or-nothing transaction; partial completion is the intended policy.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use rebill_core::{
    eligibility, format_amount, BillingProvider, ChargeRequest, Customer, Payment,
    PaymentMethodKind, ProviderError,
};

use crate::config::BatchConfig;

/// Pause in test mode, for output readability only.
const TEST_MODE_DELAY: Duration = Duration::from_millis(200);

/// One customer as listed at screening time.
#[derive(Debug, Clone)]
pub struct CustomerRow {
    /// Provider customer ID.
    pub id: String,
    /// Display name (placeholder when the record has none).
    pub name: String,
    /// Email (placeholder when the record has none).
    pub email: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.display_name().to_string(),
            email: customer.display_email().to_string(),
        }
    }
}

impl fmt::Display for CustomerRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.email, self.id)
    }
}

/// Outcome of a single charge attempt.
#[derive(Debug, Clone)]
pub enum ChargeOutcome {
    /// The provider accepted the charge. Test-mode rows have no payment id.
    Succeeded {
        /// Provider payment ID, absent for test-mode rows.
        payment_id: Option<String>,
    },
    /// The provider rejected the charge.
    Failed {
        /// The provider's error message, verbatim.
        error: String,
    },
}

/// A charge attempt against one customer.
#[derive(Debug, Clone)]
pub struct ChargeAttempt {
    /// The customer row.
    pub customer: CustomerRow,
    /// What happened.
    pub outcome: ChargeOutcome,
}

/// Result of screening the account's customers.
#[derive(Debug)]
pub struct Screened {
    /// Customers chargeable via a regular card, in listing order.
    pub eligible: Vec<CustomerRow>,
    /// Customers skipped (Link / Google Pay / Apple Pay or nothing on file).
    pub skipped: usize,
}

/// A completed batch run.
#[derive(Debug)]
pub struct BatchRun {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Whether real charges were issued.
    pub live: bool,
    /// Per-customer amount, minor units.
    pub amount_cents: i64,
    /// Currency code.
    pub currency: String,
    /// Rows that charged (or, in test mode, would have).
    pub successful: Vec<ChargeAttempt>,
    /// Rows that failed, with the provider's message.
    pub failed: Vec<ChargeAttempt>,
}

impl BatchRun {
    /// Total amount collected: successes times the fixed per-customer amount,
    /// exact in integer minor units.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn total_charged_cents(&self) -> i64 {
        self.successful.len() as i64 * self.amount_cents
    }
}

/// Truncate the eligible list to the configured cap, preserving original
/// order. A cap of 0 means unlimited.
#[must_use]
pub fn cap_rows(mut rows: Vec<CustomerRow>, cap: usize) -> Vec<CustomerRow> {
    if cap > 0 && rows.len() > cap {
        rows.truncate(cap);
    }
    rows
}

/// The typed token an operator must enter before a live run charges anything.
#[must_use]
pub fn confirmation_accepted(input: &str) -> bool {
    input.trim() == "YES"
}

/// Screens customers and charges them one at a time.
pub struct BatchRunner<'a> {
    provider: &'a dyn BillingProvider,
    config: &'a BatchConfig,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner over a provider and an immutable run configuration.
    #[must_use]
    pub fn new(provider: &'a dyn BillingProvider, config: &'a BatchConfig) -> Self {
        Self { provider, config }
    }

    /// Walk every customer and partition by regular-card eligibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer listing itself fails; per-customer
    /// lookup failures only affect that customer's classification.
    pub async fn screen(&self) -> Result<Screened, ProviderError> {
        let customers = self.provider.list_customers().await?;

        let mut eligible = Vec::new();
        let mut skipped = 0;

        for customer in &customers {
            if eligibility::is_chargeable(self.provider, customer).await {
                eligible.push(CustomerRow::from(customer));
            } else {
                skipped += 1;
            }
        }

        tracing::info!(
            eligible = eligible.len(),
            skipped,
            "customer screening complete"
        );
        Ok(Screened { eligible, skipped })
    }

    /// Charge every row in order. Errors are caught per row; the run always
    /// completes. Sleeps the configured delay after each customer.
    pub async fn charge_all(&self, rows: Vec<CustomerRow>) -> BatchRun {
        let mut run = BatchRun {
            started_at: Utc::now(),
            live: self.config.live,
            amount_cents: self.config.amount_cents,
            currency: self.config.currency.clone(),
            successful: Vec::new(),
            failed: Vec::new(),
        };

        let total = rows.len();
        for (index, row) in rows.into_iter().enumerate() {
            println!(
                "[{}/{}] Charging {} ({})...",
                index + 1,
                total,
                row.name,
                row.email
            );

            if !self.config.live {
                println!(
                    "  ✓ TEST MODE: Would charge {}",
                    format_amount(self.config.amount_cents, &self.config.currency)
                );
                run.successful.push(ChargeAttempt {
                    customer: row,
                    outcome: ChargeOutcome::Succeeded { payment_id: None },
                });
                tokio::time::sleep(TEST_MODE_DELAY).await;
                continue;
            }

            match self.charge_one(&row).await {
                Ok(payment) => {
                    println!("  ✓ Success! Payment ID: {}", payment.id);
                    run.successful.push(ChargeAttempt {
                        customer: row,
                        outcome: ChargeOutcome::Succeeded {
                            payment_id: Some(payment.id),
                        },
                    });
                }
                Err(error) => {
                    let message = error.to_string();
                    println!("  ✗ Error: {message}");
                    run.failed.push(ChargeAttempt {
                        customer: row,
                        outcome: ChargeOutcome::Failed { error: message },
                    });
                }
            }

            // Throttle, not retry: fixed pause between charge attempts.
            tokio::time::sleep(self.config.delay).await;
        }

        tracing::info!(
            successful = run.successful.len(),
            failed = run.failed.len(),
            live = run.live,
            "batch run complete"
        );
        run
    }

    /// Charge one customer: prefer the invoice-settings default method, then
    /// the first card on file, then fall back to a legacy charge keyed only
    /// by customer id.
    async fn charge_one(&self, row: &CustomerRow) -> Result<Payment, ProviderError> {
        let payment_method = self.resolve_payment_method(&row.id).await?;

        match payment_method {
            Some(method_id) => {
                self.provider
                    .create_payment(&ChargeRequest {
                        customer: row.id.clone(),
                        payment_method: Some(method_id),
                        amount_cents: self.config.amount_cents,
                        currency: self.config.currency.clone(),
                        description: self.config.description.clone(),
                    })
                    .await
            }
            None => {
                self.provider
                    .create_legacy_charge(
                        &row.id,
                        self.config.amount_cents,
                        &self.config.currency,
                        &self.config.description,
                    )
                    .await
            }
        }
    }

    async fn resolve_payment_method(
        &self,
        customer_id: &str,
    ) -> Result<Option<String>, ProviderError> {
        let customer = self.provider.retrieve_customer(customer_id).await?;

        if let Some(method_id) = customer.invoice_default_payment_method() {
            return Ok(Some(method_id.to_string()));
        }

        let methods = self
            .provider
            .list_payment_methods(customer_id, Some(PaymentMethodKind::Card))
            .await?;
        Ok(methods.into_iter().next().map(|method| method.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> CustomerRow {
        CustomerRow {
            id: id.to_string(),
            name: format!("Name {id}"),
            email: format!("{id}@example.com"),
        }
    }

    #[test]
    fn cap_preserves_order() {
        let rows = vec![row("cus_1"), row("cus_2"), row("cus_3")];
        let capped = cap_rows(rows, 2);
        let ids: Vec<&str> = capped.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["cus_1", "cus_2"]);
    }

    #[test]
    fn zero_cap_means_unlimited() {
        let rows = vec![row("cus_1"), row("cus_2")];
        assert_eq!(cap_rows(rows, 0).len(), 2);
    }

    #[test]
    fn confirmation_requires_the_exact_token() {
        assert!(confirmation_accepted("YES"));
        assert!(confirmation_accepted("  YES\n"));
        assert!(!confirmation_accepted("yes"));
        assert!(!confirmation_accepted("Y"));
        assert!(!confirmation_accepted(""));
    }

    #[test]
    fn total_charged_is_exact() {
        let run = BatchRun {
            started_at: Utc::now(),
            live: true,
            amount_cents: 2999,
            currency: "usd".into(),
            successful: (0..37)
                .map(|i| ChargeAttempt {
                    customer: row(&format!("cus_{i}")),
                    outcome: ChargeOutcome::Succeeded {
                        payment_id: Some(format!("pi_{i}")),
                    },
                })
                .collect(),
            failed: Vec::new(),
        };
        assert_eq!(run.total_charged_cents(), 37 * 2999);
    }
}
