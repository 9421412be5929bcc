//! Flat-text run report.
//!
//! One file per batch run, named with the run timestamp. Plain lines only so
//! the file greps and diffs cleanly; no structured format.

use std::io;
use std::path::{Path, PathBuf};

use rebill_core::format_amount;

use crate::batch::{BatchRun, ChargeOutcome};

/// Section separator used throughout the operator output.
pub const SEPARATOR: &str =
    "============================================================";

/// Render the run as flat text.
#[must_use]
pub fn render(run: &BatchRun) -> String {
    let mut out = String::new();

    out.push_str("Stripe Batch Charging Results\n");
    out.push_str(&format!(
        "Date: {}\n",
        run.started_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Mode: {}\n",
        if run.live { "LIVE" } else { "TEST" }
    ));
    out.push_str(&format!(
        "Amount: {}\n",
        format_amount(run.amount_cents, &run.currency)
    ));

    out.push_str(&format!("\nSuccessful: {}\n", run.successful.len()));
    out.push_str(&format!("Failed: {}\n", run.failed.len()));

    if run.live {
        out.push_str(&format!(
            "\nTotal Charged: {}\n",
            format_amount(run.total_charged_cents(), &run.currency)
        ));
    }

    out.push_str(&format!("\n{SEPARATOR}\n"));
    out.push_str("SUCCESSFUL CHARGES:\n");
    out.push_str(&format!("{SEPARATOR}\n"));
    for attempt in &run.successful {
        out.push_str(&format!(
            "{} - {} - {}\n",
            attempt.customer.name, attempt.customer.email, attempt.customer.id
        ));
    }

    if !run.failed.is_empty() {
        out.push_str(&format!("\n{SEPARATOR}\n"));
        out.push_str("FAILED CHARGES:\n");
        out.push_str(&format!("{SEPARATOR}\n"));
        for attempt in &run.failed {
            out.push_str(&format!(
                "{} - {} - {}\n",
                attempt.customer.name, attempt.customer.email, attempt.customer.id
            ));
            if let ChargeOutcome::Failed { error } = &attempt.outcome {
                out.push_str(&format!("  Error: {error}\n\n"));
            }
        }
    }

    out
}

/// Write the rendered report into `dir` as
/// `charge_results_<YYYYmmdd_HHMMSS>.txt` and return the path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_report(run: &BatchRun, dir: &Path) -> io::Result<PathBuf> {
    let filename = format!(
        "charge_results_{}.txt",
        run.started_at.format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);
    std::fs::write(&path, render(run))?;
    Ok(path)
}
