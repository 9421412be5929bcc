//! Invoice objects for the retry-failed-payments operations.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A provider invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    /// Provider invoice ID (`in_...`).
    pub id: String,

    /// Owning customer ID.
    #[serde(default)]
    pub customer: Option<String>,

    /// Invoice status (`open`, `paid`, `void`, ...).
    #[serde(default)]
    pub status: Option<String>,

    /// Amount still owed, minor currency units.
    #[serde(default)]
    pub amount_due: i64,

    /// Amount collected so far, minor currency units.
    #[serde(default)]
    pub amount_paid: i64,

    /// Whether the provider has attempted collection.
    #[serde(default)]
    pub attempted: bool,

    /// Number of collection attempts so far.
    #[serde(default)]
    pub attempt_count: i64,

    /// Whether the invoice is settled.
    #[serde(default)]
    pub paid: bool,

    /// Created timestamp (Unix seconds).
    #[serde(default)]
    pub created: i64,
}

impl Invoice {
    /// An open invoice that was attempted and is still unpaid is a candidate
    /// for a manual payment retry.
    #[must_use]
    pub fn needs_retry(&self) -> bool {
        self.attempted && !self.paid
    }

    /// Creation time as a UTC datetime.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.created, 0).unwrap_or_default()
    }
}
