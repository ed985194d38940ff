//! In-memory market data for tests and offline runs.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::OptionContract;

#[derive(Debug, Default)]
struct SymbolData {
    price: Option<Decimal>,
    chains: BTreeMap<NaiveDate, Vec<OptionContract>>,
    failing: Vec<NaiveDate>,
}

/// Market data served from memory.
#[derive(Debug, Default)]
pub struct StaticMarketData {
    symbols: RwLock<HashMap<String, SymbolData>>,
}

impl StaticMarketData {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price of a symbol.
    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.symbols
            .write()
            .entry(symbol.to_string())
            .or_default()
            .price = Some(price);
    }

    /// Set the put chain of one expiration.
    pub fn set_chain(&self, symbol: &str, expiration: NaiveDate, contracts: Vec<OptionContract>) {
        self.symbols
            .write()
            .entry(symbol.to_string())
            .or_default()
            .chains
            .insert(expiration, contracts);
    }

    /// Make chain requests for one expiration fail.
    pub fn fail_chain(&self, symbol: &str, expiration: NaiveDate) {
        let mut symbols = self.symbols.write();
        let data = symbols.entry(symbol.to_string()).or_default();
        data.chains.entry(expiration).or_default();
        data.failing.push(expiration);
    }
}

fn not_found(symbol: &str) -> MarketDataError {
    MarketDataError::SymbolNotFound {
        symbol: symbol.to_string(),
    }
}

#[async_trait]
impl MarketDataPort for StaticMarketData {
    async fn current_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        self.symbols
            .read()
            .get(symbol)
            .and_then(|d| d.price)
            .ok_or_else(|| not_found(symbol))
    }

    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
        self.symbols
            .read()
            .get(symbol)
            .map(|d| d.chains.keys().copied().collect())
            .ok_or_else(|| not_found(symbol))
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<Vec<OptionContract>, MarketDataError> {
        let symbols = self.symbols.read();
        let data = symbols.get(symbol).ok_or_else(|| not_found(symbol))?;

        if data.failing.contains(&expiration) {
            return Err(MarketDataError::DataUnavailable {
                message: format!("chain for {symbol} {expiration} unavailable"),
            });
        }
        Ok(data.chains.get(&expiration).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serves_configured_data() {
        let feed = StaticMarketData::new();
        let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        feed.set_price("AAPL", dec!(229.62));
        feed.set_chain("AAPL", date, Vec::new());

        tokio_test::block_on(async {
            assert_eq!(feed.current_price("AAPL").await.unwrap(), dec!(229.62));
            assert_eq!(feed.expirations("AAPL").await.unwrap(), vec![date]);
            assert!(feed.option_chain("AAPL", date).await.unwrap().is_empty());
            assert!(matches!(
                feed.current_price("MSFT").await,
                Err(MarketDataError::SymbolNotFound { .. })
            ));
        });
    }

    #[test]
    fn failing_chain_reports_unavailable() {
        let feed = StaticMarketData::new();
        let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        feed.fail_chain("AAPL", date);

        let result = tokio_test::block_on(feed.option_chain("AAPL", date));
        assert!(matches!(result, Err(MarketDataError::DataUnavailable { .. })));
    }
}
