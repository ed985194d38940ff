//! Underlying quotes and put contracts as delivered by the market data gateway.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shares covered by one listed equity option contract.
pub const CONTRACT_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// Spot price of an underlying at analysis time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol (e.g., "AAPL").
    pub symbol: String,
    /// Last traded price of the underlying.
    pub current_price: Decimal,
    /// When the price was observed.
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Create a quote.
    #[must_use]
    pub fn new(symbol: impl Into<String>, current_price: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            current_price,
            timestamp,
        }
    }
}

/// A listed put contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol.
    pub symbol: String,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// Strike price.
    pub strike: Decimal,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Last traded price.
    pub last_price: Decimal,
    /// Implied volatility as a fraction (0.30 = 30%), when the provider has one.
    pub implied_volatility: Option<f64>,
}

impl OptionContract {
    /// Premium a seller can expect per share.
    ///
    /// Midpoint of bid and ask when both sides are quoted, otherwise the last
    /// trade. Returns `None` when neither yields a positive price.
    #[must_use]
    pub fn premium(&self) -> Option<Decimal> {
        let premium = if self.bid > Decimal::ZERO && self.ask > Decimal::ZERO {
            (self.bid + self.ask) / Decimal::TWO
        } else {
            self.last_price
        };

        (premium > Decimal::ZERO).then_some(premium)
    }

    /// Calendar days from `as_of` until expiration. Negative once expired.
    #[must_use]
    pub fn days_to_expiry(&self, as_of: NaiveDate) -> i64 {
        (self.expiration_date - as_of).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contract(bid: Decimal, ask: Decimal, last: Decimal) -> OptionContract {
        OptionContract {
            symbol: "AAPL".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            strike: dec!(225),
            bid,
            ask,
            last_price: last,
            implied_volatility: Some(0.25),
        }
    }

    #[test]
    fn premium_uses_midpoint_when_both_sides_quoted() {
        assert_eq!(
            contract(dec!(0.95), dec!(1.05), dec!(0.80)).premium(),
            Some(dec!(1.00))
        );
    }

    #[test]
    fn premium_falls_back_to_last_price() {
        assert_eq!(
            contract(dec!(0), dec!(1.05), dec!(0.80)).premium(),
            Some(dec!(0.80))
        );
        assert_eq!(
            contract(dec!(0.95), dec!(0), dec!(0.70)).premium(),
            Some(dec!(0.70))
        );
    }

    #[test]
    fn premium_excludes_unpriced_contracts() {
        assert_eq!(contract(dec!(0), dec!(0), dec!(0)).premium(), None);
    }

    #[test]
    fn days_to_expiry_counts_calendar_days() {
        let c = contract(dec!(1), dec!(1), dec!(1));
        let as_of = NaiveDate::from_ymd_opt(2025, 8, 8).unwrap();
        assert_eq!(c.days_to_expiry(as_of), 7);

        let after = NaiveDate::from_ymd_opt(2025, 8, 16).unwrap();
        assert_eq!(c.days_to_expiry(after), -1);
    }
}
