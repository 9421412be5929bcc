//! Core types and charge-eligibility rules for rebill.
//!
//! This crate provides the foundational pieces used throughout the rebill toolkit:
//!
//! - **Provider objects**: `Customer`, `PaymentMethod`, `Subscription`, `Invoice`
//! - **Charging**: `ChargeRequest`, `Payment`
//! - **Eligibility**: the regular-card classifier that decides which customers
//!   can be batch-charged
//! - **Provider seam**: the [`BillingProvider`] trait the rest of the workspace
//!   is polymorphic over
//!
//! # Amounts
//!
//! All amounts are integer minor currency units (`i64` cents). $29.99 is stored
//! as `2999`; no floating point touches money.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod charge;
pub mod customer;
pub mod eligibility;
pub mod error;
pub mod invoice;
pub mod money;
pub mod provider;
pub mod subscription;

pub use charge::{ChargeRequest, Payment};
pub use customer::{Customer, InvoiceSettings, PaymentMethod, PaymentMethodKind};
pub use eligibility::{classify, is_chargeable, CardCheck};
pub use error::ProviderError;
pub use invoice::Invoice;
pub use money::format_amount;
pub use provider::BillingProvider;
pub use subscription::Subscription;
