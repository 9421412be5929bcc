//! Numbered stdin menu over the rebilling operations.

use std::io::{self, Write};

use rebill_core::format_amount;

use crate::ops::Rebiller;

/// Print a message and read one trimmed line from stdin.
///
/// # Errors
///
/// Returns an error if stdin or stdout is unavailable.
pub fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Show the menu once, dispatch the chosen operation, and return.
///
/// # Errors
///
/// Returns an error if stdin fails; provider errors are printed, not
/// propagated.
pub async fn run(rebiller: &Rebiller<'_>) -> io::Result<()> {
    println!("\n=== Stripe Subscription Rebilling ===\n");
    println!("Select an option:");
    println!("1. View all customers (with payment methods)");
    println!("2. Charge a single customer");
    println!("3. Retry failed payments");
    println!("4. View active subscriptions");
    println!("5. View failed invoices");
    println!("6. Batch rebill multiple customers");
    println!("0. Exit");

    let choice = prompt("\nEnter your choice: ")?;

    match choice.as_str() {
        "1" => view_customers(rebiller).await,
        "2" => charge_single(rebiller).await?,
        "3" => retry_failed(rebiller).await,
        "4" => view_subscriptions(rebiller).await,
        "5" => view_failed_invoices(rebiller).await,
        "6" => batch_rebill(rebiller).await?,
        "0" => println!("Exiting..."),
        _ => println!("Invalid choice"),
    }

    Ok(())
}

async fn view_customers(rebiller: &Rebiller<'_>) {
    println!("\nRetrieving all customers...");
    match rebiller.customers_overview().await {
        Ok(customers) => {
            println!("\nFound {} customers:\n", customers.len());
            for customer in customers {
                println!("Customer ID: {}", customer.customer_id);
                println!("  Name: {}", customer.name);
                println!("  Email: {}", customer.email);
                println!(
                    "  Payment Method: {}",
                    if customer.has_payment_method {
                        "✓ Yes"
                    } else {
                        "✗ No"
                    }
                );
                if !customer.description.is_empty() {
                    println!("  Description: {}", customer.description);
                }
                println!("  Created: {}", customer.created.format("%Y-%m-%d %H:%M:%S"));
                println!();
            }
        }
        Err(error) => println!("\n✗ Error: {error}"),
    }
}

async fn charge_single(rebiller: &Rebiller<'_>) -> io::Result<()> {
    let customer_id = prompt("Enter customer ID: ")?;
    let amount = prompt("Enter amount in cents (e.g., 1000 for $10.00): ")?;
    let Ok(amount_cents) = amount.parse::<i64>() else {
        println!("Invalid amount");
        return Ok(());
    };
    let description = prompt("Enter description: ")?;

    match rebiller
        .charge_customer(&customer_id, amount_cents, "usd", &description)
        .await
    {
        Ok(payment) => {
            println!("\n✓ Success! Payment Intent ID: {}", payment.id);
            println!("Status: {}", payment.status);
            println!("Amount: {}", format_amount(amount_cents, "usd"));
        }
        Err(error) => println!("\n✗ Error: {error}"),
    }

    Ok(())
}

async fn retry_failed(rebiller: &Rebiller<'_>) {
    println!("\nRetrying all failed payments...");
    match rebiller.retry_all_failed().await {
        Ok(outcome) => {
            println!("\nTotal invoices: {}", outcome.total);
            println!("Successful: {}", outcome.successful.len());
            println!("Failed: {}", outcome.failed.len());

            if !outcome.failed.is_empty() {
                println!("\nFailed retries:");
                for failure in &outcome.failed {
                    println!("  - Invoice {}: {}", failure.invoice_id, failure.error);
                }
            }
        }
        Err(error) => println!("\n✗ Error: {error}"),
    }
}

async fn view_subscriptions(rebiller: &Rebiller<'_>) {
    println!("\nRetrieving active subscriptions...");
    match rebiller.active_subscriptions().await {
        Ok(subscriptions) => {
            println!("\nFound {} active subscriptions:\n", subscriptions.len());
            for subscription in subscriptions {
                println!("Subscription ID: {}", subscription.id);
                println!("  Customer: {}", subscription.customer);
                println!("  Status: {}", subscription.status);
                println!(
                    "  Amount: {}",
                    format_amount(subscription.unit_amount_cents(), "usd")
                );
                println!(
                    "  Next billing: {}",
                    subscription.current_period_end_at().format("%Y-%m-%d %H:%M:%S")
                );
                println!();
            }
        }
        Err(error) => println!("\n✗ Error: {error}"),
    }
}

async fn view_failed_invoices(rebiller: &Rebiller<'_>) {
    println!("\nRetrieving failed invoices...");
    match rebiller.failed_invoices().await {
        Ok(invoices) => {
            println!("\nFound {} failed invoices:\n", invoices.len());
            for invoice in invoices {
                println!("Invoice ID: {}", invoice.invoice_id);
                println!(
                    "  Customer: {}",
                    invoice.customer_id.as_deref().unwrap_or("unknown")
                );
                println!("  Amount: {}", format_amount(invoice.amount_cents, "usd"));
                println!("  Attempts: {}", invoice.attempt_count);
                println!("  Created: {}", invoice.created.format("%Y-%m-%d %H:%M:%S"));
                println!();
            }
        }
        Err(error) => println!("\n✗ Error: {error}"),
    }
}

async fn batch_rebill(rebiller: &Rebiller<'_>) -> io::Result<()> {
    println!("\nBatch rebilling customers");
    let ids = prompt("Enter customer IDs separated by commas:\n")?;
    let customer_ids: Vec<String> = ids
        .split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    let amount = prompt("Enter amount in cents (e.g., 1000 for $10.00): ")?;
    let Ok(amount_cents) = amount.parse::<i64>() else {
        println!("Invalid amount");
        return Ok(());
    };
    let description = prompt("Enter description: ")?;

    println!("\nProcessing batch rebilling...");
    let outcome = rebiller
        .batch_rebill(&customer_ids, amount_cents, "usd", &description)
        .await;

    println!("\nTotal customers: {}", outcome.total);
    println!("Successful: {}", outcome.successful.len());
    println!("Failed: {}", outcome.failed.len());

    if !outcome.failed.is_empty() {
        println!("\nFailed charges:");
        for failure in &outcome.failed {
            println!("  - Customer {}: {}", failure.customer_id, failure.error);
        }
    }

    Ok(())
}
