//! Lenient parsing and rounding for user-supplied amounts.

/// Parse an amount form field, coercing anything unusable to zero.
///
/// Invalid input is deliberately not rejected: a blank field, junk text, a
/// non-finite number or a negative number all become `0.0`. Amounts are
/// non-negative by policy.
pub fn parse_amount_lenient(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Round to two decimal places for display and totals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
