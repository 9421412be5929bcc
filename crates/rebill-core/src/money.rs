//! Minor-currency-unit formatting for operator output.

/// Format integer minor units the way the operator tooling prints money:
/// `format_amount(2999, "usd")` is `"$29.99 USD"`.
///
/// Integer arithmetic only; no rounding drift for cent amounts.
#[must_use]
pub fn format_amount(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02} {}",
        abs / 100,
        abs % 100,
        currency.to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dollars_and_cents() {
        assert_eq!(format_amount(100, "usd"), "$1.00 USD");
        assert_eq!(format_amount(2999, "usd"), "$29.99 USD");
        assert_eq!(format_amount(5, "eur"), "$0.05 EUR");
        assert_eq!(format_amount(0, "gbp"), "$0.00 GBP");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_amount(-150, "usd"), "-$1.50 USD");
    }

    #[test]
    fn no_rounding_drift_when_summing() {
        // 37 charges of $29.99 must total exactly $1,109.63.
        let total: i64 = (0..37).map(|_| 2999).sum();
        assert_eq!(format_amount(total, "usd"), "$1109.63 USD");
    }
}
