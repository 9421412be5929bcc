//! Diagnostic listing of customers and their saved payment instruments.
//!
//! Read-only: shows why customers might not be chargeable without touching
//! anything.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rebill_cli::config::{key_mode, stripe_api_key, KeyMode};
use rebill_cli::report::SEPARATOR;
use rebill_core::PaymentMethodKind;
use rebill_stripe::{StripeClient, StripeError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rebill=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = match stripe_api_key() {
        Ok(key) => key,
        Err(error) => {
            println!("ERROR: {error}");
            return Ok(());
        }
    };

    println!("\n{SEPARATOR}");
    println!("STRIPE CUSTOMER DIAGNOSTIC");
    println!("{SEPARATOR}");

    let mode = key_mode(&api_key);
    match mode {
        KeyMode::Test => println!("\nUsing TEST MODE API key (only TEST customers are visible)"),
        KeyMode::Live => println!("\nUsing LIVE MODE API key (only LIVE customers are visible)"),
        KeyMode::Unknown => println!("\nUnknown API key format"),
    }

    println!("\nRetrieving ALL customers from Stripe...");

    let client = StripeClient::new(&api_key);
    if let Err(error) = diagnose(&client, mode).await {
        println!("\n✗ Stripe Error: {error}");
        println!("\nThis might mean:");
        println!("- Invalid API key");
        println!("- API key doesn't have permission");
        println!("- Network connection issue");
    }

    Ok(())
}

async fn diagnose(client: &StripeClient, mode: KeyMode) -> Result<(), StripeError> {
    let customers = client.list_customers().await?;

    println!("\n✓ Found {} total customers in the account", customers.len());

    if customers.is_empty() {
        println!("\nNO CUSTOMERS FOUND!");
        println!("\nPossible reasons:");
        println!("1. Using a TEST key against LIVE customers (or vice versa)");
        println!("2. The Stripe account has no customers");
        println!("\nCheck the Stripe Dashboard:");
        match mode {
            KeyMode::Test => println!("   https://dashboard.stripe.com/test/customers"),
            _ => println!("   https://dashboard.stripe.com/customers"),
        }
        return Ok(());
    }

    println!("\n{SEPARATOR}");
    println!("CUSTOMER DETAILS:");
    println!("{SEPARATOR}\n");

    let mut with_payment_method = 0;
    let mut with_default_source = 0;
    let mut with_invoice_default = 0;

    for (index, customer) in customers.iter().enumerate() {
        println!("{}. Customer ID: {}", index + 1, customer.id);
        println!("   Email: {}", customer.display_email());
        println!("   Name: {}", customer.display_name());
        println!("   Created: {}", customer.created_at().format("%Y-%m-%d %H:%M:%S"));

        let cards = client
            .list_payment_methods(&customer.id, Some(PaymentMethodKind::Card))
            .await?;
        if cards.is_empty() {
            println!("   ✗ Has PaymentMethod (card): NO");
        } else {
            with_payment_method += 1;
            println!("   ✓ Has PaymentMethod (card): YES");
        }

        if let Some(source) = &customer.default_source {
            with_default_source += 1;
            println!("   ✓ Has default source: YES ({source})");
        } else {
            println!("   ✗ Has default source: NO");
        }

        if customer.invoice_default_payment_method().is_some() {
            with_invoice_default += 1;
            println!("   ✓ Has invoice default PM: YES");
        } else {
            println!("   ✗ Has invoice default PM: NO");
        }

        println!();
    }

    println!("{SEPARATOR}");
    println!("SUMMARY:");
    println!("{SEPARATOR}");
    println!("Total customers: {}", customers.len());
    println!("Customers with PaymentMethod: {with_payment_method}");
    println!("Customers with default source: {with_default_source}");
    println!("Customers with invoice default PM: {with_invoice_default}");

    let chargeable = with_payment_method
        .max(with_default_source)
        .max(with_invoice_default);
    println!("\n✓ Customers that CAN be charged: {chargeable}");

    if chargeable == 0 {
        println!("\n{SEPARATOR}");
        println!("NO CUSTOMERS HAVE SAVED PAYMENT METHODS!");
        println!("{SEPARATOR}");
        println!("\nPayment methods are only saved when checkout asks for it:");
        println!("- Use setup_future_usage=off_session on Payment Intents, or");
        println!("- Create Subscriptions (Stripe saves the method automatically), or");
        println!("- Attach payment methods manually in the Dashboard.");
    }

    Ok(())
}
