//! Formatting helpers for report values.

use rust_decimal::{Decimal, RoundingStrategy};

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Dollar amount with 2 decimal places.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    format!("${:.2}", round(value, 2))
}

/// Dollar amount with 3 decimal places (time decay).
#[must_use]
pub fn format_money_fine(value: Decimal) -> String {
    format!("${:.3}", round(value, 3))
}

/// Whole-dollar amount.
#[must_use]
pub fn format_dollars(value: Decimal) -> String {
    format!("${}", round(value, 0).normalize())
}

/// Signed dollar amount (`-$4.62`, `$1.25`).
#[must_use]
pub fn format_signed_money(value: Decimal) -> String {
    if value.is_sign_negative() && !round(value, 2).is_zero() {
        format!("-{}", format_money(value.abs()))
    } else {
        format_money(value.abs())
    }
}

/// Strike without trailing zeros (`$195`, `$197.5`).
#[must_use]
pub fn format_strike(value: Decimal) -> String {
    format!("${}", value.normalize())
}

/// Percentage with one decimal place.
#[must_use]
pub fn format_pct(value: f64) -> String {
    format!("{value:.1}%")
}
