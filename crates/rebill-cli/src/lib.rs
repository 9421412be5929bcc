//! Operator tooling for batch charging and rebilling Stripe customers.
//!
//! Three binaries share this library:
//!
//! - `charge-all`: screen every customer for regular-card eligibility and
//!   charge the eligible ones in one confirmed batch
//! - `rebill`: a numbered menu over single-shot operations (one-off charge,
//!   subscription creation, invoice retries, batch rebilling by explicit ids)
//! - `check-customers`: read-only diagnostic of saved payment instruments
//!
//! All library code is polymorphic over [`rebill_core::BillingProvider`]; only
//! the binaries name the Stripe client.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;
pub mod config;
pub mod menu;
pub mod ops;
pub mod report;
