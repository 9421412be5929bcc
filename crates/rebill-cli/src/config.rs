//! Run configuration.
//!
//! The batch charger is tuned by environment variables with hardcoded
//! defaults; the resulting [`BatchConfig`] is immutable for the whole run so
//! every row is charged the same amount under the same policy.

use std::str::FromStr;
use std::time::Duration;

/// Default per-customer amount in minor units ($1.00).
pub const DEFAULT_AMOUNT_CENTS: i64 = 100;

/// Default currency code.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Default charge description.
pub const DEFAULT_DESCRIPTION: &str = "Monthly Subscription Fee";

/// Default cap on customers per run. Keeps a first run small enough to not
/// trip the provider's fraud screening.
pub const DEFAULT_MAX_CUSTOMERS: usize = 1000;

/// Default delay between charges in milliseconds (request-rate throttle).
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The secret API key is not present in the environment.
    #[error("STRIPE_SECRET_KEY is not set. Example: export STRIPE_SECRET_KEY='sk_test_...'")]
    MissingApiKey,
}

/// Immutable settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Amount charged to every customer, minor currency units.
    pub amount_cents: i64,

    /// Currency code, lowercase.
    pub currency: String,

    /// Charge description.
    pub description: String,

    /// `true` issues real charges; `false` previews the run.
    pub live: bool,

    /// Maximum customers to charge in one run; 0 means unlimited.
    pub max_customers: usize,

    /// Fixed sleep between charge attempts.
    pub delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            amount_cents: DEFAULT_AMOUNT_CENTS,
            currency: DEFAULT_CURRENCY.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            live: false,
            max_customers: DEFAULT_MAX_CUSTOMERS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl BatchConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above. Supported variables: `CHARGE_AMOUNT_CENTS`,
    /// `CHARGE_CURRENCY`, `CHARGE_DESCRIPTION`, `LIVE_MODE`, `MAX_CUSTOMERS`,
    /// `CHARGE_DELAY_MS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            amount_cents: env_parse("CHARGE_AMOUNT_CENTS", DEFAULT_AMOUNT_CENTS),
            currency: std::env::var("CHARGE_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
            description: std::env::var("CHARGE_DESCRIPTION")
                .unwrap_or_else(|_| DEFAULT_DESCRIPTION.to_string()),
            live: env_parse("LIVE_MODE", false),
            max_customers: env_parse("MAX_CUSTOMERS", DEFAULT_MAX_CUSTOMERS),
            delay: Duration::from_millis(env_parse("CHARGE_DELAY_MS", DEFAULT_DELAY_MS)),
        }
    }
}

/// Read the secret API key. Checked once at startup, before any network call.
///
/// # Errors
///
/// Returns [`ConfigError::MissingApiKey`] when the variable is absent or
/// empty.
pub fn stripe_api_key() -> Result<String, ConfigError> {
    match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey),
    }
}

/// Which Stripe environment a secret key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// `sk_test_...` key.
    Test,
    /// `sk_live_...` key.
    Live,
    /// Unrecognized key format.
    Unknown,
}

/// Classify a secret key by its prefix.
#[must_use]
pub fn key_mode(api_key: &str) -> KeyMode {
    if api_key.starts_with("sk_test") {
        KeyMode::Test
    } else if api_key.starts_with("sk_live") {
        KeyMode::Live
    } else {
        KeyMode::Unknown
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
