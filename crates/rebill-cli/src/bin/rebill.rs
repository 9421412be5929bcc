//! Interactive rebilling menu over the Stripe account.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rebill_cli::config::stripe_api_key;
use rebill_cli::menu;
use rebill_cli::ops::Rebiller;
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

    let client = StripeClient::new(&api_key);
    let rebiller = Rebiller::new(&client);

    menu::run(&rebiller).await?;

    Ok(())
}
