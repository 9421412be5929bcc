//! Batch-charge every customer with a regular card payment method.
//!
//! Skips Link, Google Pay and Apple Pay customers, caps and confirms the
//! batch, then charges one customer at a time with a fixed delay.

use std::path::Path;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rebill_cli::batch::{cap_rows, confirmation_accepted, BatchRunner};
use rebill_cli::config::{stripe_api_key, BatchConfig};
use rebill_cli::menu::prompt;
use rebill_cli::report::{write_report, SEPARATOR};
use rebill_core::format_amount;
use rebill_stripe::StripeClient;

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

    let config = BatchConfig::from_env();
    let client = StripeClient::new(&api_key);
    let runner = BatchRunner::new(&client, &config);

    println!("\n{SEPARATOR}");
    println!("STRIPE BATCH CHARGING");
    println!("{SEPARATOR}");
    println!(
        "\nAmount to charge: {}",
        format_amount(config.amount_cents, &config.currency)
    );
    println!("Description: {}", config.description);
    println!(
        "Mode: {}",
        if config.live {
            "LIVE MODE - REAL CHARGES"
        } else {
            "TEST MODE - Dry Run"
        }
    );
    println!("Time: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));

    if config.max_customers > 0 {
        println!("\nRadar protection: limiting to {} customers", config.max_customers);
    }
    println!(
        "Radar protection: {}ms delay between charges",
        config.delay.as_millis()
    );

    if !config.live {
        println!("\nTEST MODE: No actual charges will be made");
        println!("Set LIVE_MODE=true to charge for real");
    }

    println!("\nRetrieving customers from Stripe...");
    println!("Checking payment methods (skipping Link, Google Pay, Apple Pay)...");

    let screened = match runner.screen().await {
        Ok(screened) => screened,
        Err(error) => {
            println!("Error retrieving customers: {error}");
            return Ok(());
        }
    };

    println!(
        "\nFound {} customers with regular card payment methods",
        screened.eligible.len()
    );
    if screened.skipped > 0 {
        println!(
            "Skipped {} customers (Link/Google Pay/Apple Pay)",
            screened.skipped
        );
    }

    if screened.eligible.is_empty() {
        println!("\n{SEPARATOR}");
        println!("NO CUSTOMERS FOUND WITH REGULAR CARD PAYMENT METHODS");
        println!("{SEPARATOR}");
        println!("\nPossible reasons:");
        println!("1. All customers have Link/Google Pay/Apple Pay (automatically skipped)");
        println!("2. Using a TEST key against LIVE customers (or vice versa)");
        println!("3. Customers paid but payment methods weren't saved");
        println!("\nRun check-customers for a per-customer diagnostic.");
        return Ok(());
    }

    let available = screened.eligible.len();
    if config.max_customers > 0 && available > config.max_customers {
        println!(
            "\nLimiting to {} customers (MAX_CUSTOMERS setting); {available} available",
            config.max_customers
        );
    }
    let rows = cap_rows(screened.eligible, config.max_customers);

    println!("\n{SEPARATOR}");
    println!("CUSTOMERS TO BE CHARGED:");
    println!("{SEPARATOR}");
    for (index, row) in rows.iter().enumerate() {
        println!("{}. {row}", index + 1);
    }

    println!("\n{SEPARATOR}");
    #[allow(clippy::cast_possible_wrap)]
    let total_cents = config.amount_cents * rows.len() as i64;
    println!(
        "Total charges: {} customers x {} = {}",
        rows.len(),
        format_amount(config.amount_cents, &config.currency),
        format_amount(total_cents, &config.currency)
    );
    println!("{SEPARATOR}");

    if config.live {
        println!("\nWARNING: You are about to charge REAL money!");
        let confirm = prompt("\nType 'YES' to proceed with charging: ")?;
        if !confirmation_accepted(&confirm) {
            println!("\nCancelled. No charges made.");
            return Ok(());
        }
    } else {
        prompt("\nPress ENTER to continue with test run...")?;
    }

    println!("\n{SEPARATOR}");
    println!("CHARGING CUSTOMERS...");
    println!("{SEPARATOR}\n");

    let run = runner.charge_all(rows).await;

    println!("\n{SEPARATOR}");
    println!("RESULTS SUMMARY");
    println!("{SEPARATOR}");
    println!("\n✓ Successful: {} customers", run.successful.len());
    println!("✗ Failed: {} customers", run.failed.len());

    if run.live {
        println!(
            "\nTotal amount charged: {}",
            format_amount(run.total_charged_cents(), &run.currency)
        );
    }

    if !run.failed.is_empty() {
        println!("\n{SEPARATOR}");
        println!("FAILED CHARGES:");
        println!("{SEPARATOR}");
        for attempt in &run.failed {
            println!("\n✗ {}", attempt.customer);
            if let rebill_cli::batch::ChargeOutcome::Failed { error } = &attempt.outcome {
                println!("   Error: {error}");
            }
        }
    }

    let path = write_report(&run, Path::new("."))?;
    println!("\nResults saved to: {}", path.display());

    println!("\n{SEPARATOR}");
    println!("COMPLETE!");
    println!("{SEPARATOR}\n");

    Ok(())
}
