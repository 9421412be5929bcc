//! Stripe API client for rebill.
//!
//! A thin, typed client over the Stripe REST API: form-encoded requests
//! authenticated with the secret key, a typed error envelope, and sequential
//! cursor pagination. Implements [`rebill_core::BillingProvider`] so the rest
//! of the workspace never names Stripe directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;

pub use client::StripeClient;
pub use error::StripeError;
