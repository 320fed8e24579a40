//! Rounding and display helpers shared by deal metrics and candidate offers.
//!
//! Whole-dollar rounding uses ties-to-even (`62.5` rounds to `62`, `63.5` to
//! `64`). Decimal rounding works from the exact binary value, so `4.55`
//! (stored as `4.5499...`) rounds to `4.5`, the same text `{:.1}` prints.

/// Rounds a currency amount to whole dollars.
pub(crate) fn round_currency(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.round_ties_even() as i64
}

/// Rounds to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    format!("{value:.places$}").parse().unwrap_or(0.0)
}

/// Formats whole dollars with thousands separators, e.g. `-12,500`.
pub(crate) fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Whole percent from a fraction, truncated toward zero (`0.70` -> `70`).
pub(crate) fn whole_percent(fraction: f64) -> i64 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).trunc() as i64
}
