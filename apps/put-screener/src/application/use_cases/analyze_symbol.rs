//! Analyze Symbol Use Case
//!
//! Fetches the quote and the nearest put chains for one symbol, scores and
//! ranks the candidates of every week, and assembles the [`StockReport`].
//! A week whose chain cannot be fetched becomes a "no data" week; only a
//! missing quote or expiration list fails the whole symbol.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::config::Config;
use crate::domain::{Quote, StockReport, WeeklyReport};
use crate::screening::{CandidateRanker, RankingView, absolute_best, best_pick};

/// Errors that abort the analysis of a symbol.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    /// Quote could not be fetched.
    #[error("Failed to fetch quote for {symbol}: {source}")]
    Quote {
        /// Symbol.
        symbol: String,
        /// Underlying error.
        source: MarketDataError,
    },

    /// Quote was not a positive price.
    #[error("Invalid price {price} for {symbol}")]
    InvalidPrice {
        /// Symbol.
        symbol: String,
        /// Price received.
        price: Decimal,
    },

    /// Expiration list could not be fetched.
    #[error("Failed to fetch expirations for {symbol}: {source}")]
    Expirations {
        /// Symbol.
        symbol: String,
        /// Underlying error.
        source: MarketDataError,
    },

    /// No expiration after the analysis date.
    #[error("No upcoming expirations for {symbol}")]
    NoExpirations {
        /// Symbol.
        symbol: String,
    },
}

/// Use case for analyzing one symbol.
pub struct AnalyzeSymbolUseCase<M>
where
    M: MarketDataPort,
{
    market_data: Arc<M>,
    ranker: CandidateRanker,
    weeks: usize,
    view: RankingView,
    max_pick_risk: f64,
    timezone: Tz,
}

impl<M> AnalyzeSymbolUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a new `AnalyzeSymbolUseCase` from configuration.
    #[must_use]
    pub fn new(market_data: Arc<M>, config: &Config) -> Self {
        Self {
            market_data,
            ranker: CandidateRanker::new(&config.screening, &config.pricing),
            weeks: config.analysis.weeks,
            view: config.analysis.view,
            max_pick_risk: config.screening.max_pick_risk,
            timezone: config.report.timezone,
        }
    }

    /// Override the ranking view.
    #[must_use]
    pub const fn with_view(mut self, view: RankingView) -> Self {
        self.view = view;
        self
    }

    /// Replace the candidate ranker.
    #[must_use]
    pub fn with_ranker(mut self, ranker: CandidateRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Analysis date for a wall-clock instant, in the market timezone.
    #[must_use]
    pub fn analysis_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    /// Analyze `symbol` as of `now`.
    pub async fn execute(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<StockReport, AnalysisError> {
        let price = self
            .market_data
            .current_price(symbol)
            .await
            .map_err(|source| AnalysisError::Quote {
                symbol: symbol.to_string(),
                source,
            })?;
        if price <= Decimal::ZERO {
            return Err(AnalysisError::InvalidPrice {
                symbol: symbol.to_string(),
                price,
            });
        }
        let quote = Quote::new(symbol, price, now);

        let as_of = self.analysis_date(now);
        let expirations = self.upcoming_expirations(symbol, as_of).await?;

        let mut weeks = Vec::with_capacity(expirations.len());
        for (index, expiration) in expirations.into_iter().enumerate() {
            let week = self.analyze_week(symbol, price, index + 1, expiration, as_of).await;
            weeks.push(week);
        }

        let absolute_best = absolute_best(&weeks);

        tracing::info!(
            symbol = %symbol,
            price = %price,
            weeks = weeks.len(),
            weeks_with_data = weeks.iter().filter(|w| w.has_data()).count(),
            has_best = absolute_best.is_some(),
            "Symbol analyzed"
        );

        Ok(StockReport {
            symbol: symbol.to_string(),
            quote,
            weeks,
            absolute_best,
        })
    }

    async fn upcoming_expirations(
        &self,
        symbol: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AnalysisError> {
        let mut expirations = self
            .market_data
            .expirations(symbol)
            .await
            .map_err(|source| AnalysisError::Expirations {
                symbol: symbol.to_string(),
                source,
            })?;

        expirations.retain(|date| *date > as_of);
        expirations.sort_unstable();
        expirations.dedup();
        expirations.truncate(self.weeks);

        if expirations.is_empty() {
            return Err(AnalysisError::NoExpirations {
                symbol: symbol.to_string(),
            });
        }
        Ok(expirations)
    }

    async fn analyze_week(
        &self,
        symbol: &str,
        spot: Decimal,
        week_number: usize,
        expiration: NaiveDate,
        as_of: NaiveDate,
    ) -> WeeklyReport {
        let days_to_expiry = (expiration - as_of).num_days();

        let contracts = match self.market_data.option_chain(symbol, expiration).await {
            Ok(contracts) => contracts,
            Err(e) => {
                tracing::warn!(
                    symbol = %symbol,
                    expiration = %expiration,
                    error = %e,
                    "Option chain unavailable, skipping week"
                );
                return WeeklyReport::no_data(week_number, expiration, days_to_expiry, e.to_string());
            }
        };

        if contracts.is_empty() {
            tracing::warn!(symbol = %symbol, expiration = %expiration, "Empty option chain");
            return WeeklyReport::no_data(
                week_number,
                expiration,
                days_to_expiry,
                "empty option chain",
            );
        }

        let candidates = self.ranker.rank(spot, &contracts, as_of, self.view);
        if candidates.is_empty() {
            return WeeklyReport::no_data(
                week_number,
                expiration,
                days_to_expiry,
                "no priced contracts near the target strikes",
            );
        }

        let pick = best_pick(&candidates, self.max_pick_risk).cloned();
        WeeklyReport::analyzed(week_number, expiration, days_to_expiry, candidates, pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::marketdata::StaticMarketData;
    use crate::domain::OptionContract;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Friday 2025-08-08, 10:30 New York
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 8, 14, 30, 0).unwrap()
    }

    fn put(expiration: NaiveDate, strike: Decimal, bid: Decimal, ask: Decimal) -> OptionContract {
        OptionContract {
            symbol: "AAPL".to_string(),
            expiration_date: expiration,
            strike,
            bid,
            ask,
            last_price: bid,
            implied_volatility: Some(0.3),
        }
    }

    fn feed() -> StaticMarketData {
        let week1 = date(2025, 8, 15);
        let week2 = date(2025, 8, 22);
        let feed = StaticMarketData::new();
        feed.set_price("AAPL", dec!(200));
        feed.set_chain(
            "AAPL",
            week1,
            vec![
                put(week1, dec!(198), dec!(2.10), dec!(2.30)),
                put(week1, dec!(195), dec!(1.00), dec!(1.10)),
                put(week1, dec!(190), dec!(0.30), dec!(0.40)),
            ],
        );
        feed.set_chain("AAPL", week2, Vec::new());
        // already expired and must be ignored
        feed.set_chain("AAPL", date(2025, 8, 1), Vec::new());
        feed
    }

    #[tokio::test]
    async fn builds_weeks_in_expiration_order() {
        let use_case = AnalyzeSymbolUseCase::new(Arc::new(feed()), &Config::default());
        let report = use_case.execute("AAPL", now()).await.unwrap();

        assert_eq!(report.weeks.len(), 2);
        assert_eq!(report.weeks[0].expiration_date, date(2025, 8, 15));
        assert_eq!(report.weeks[0].days_to_expiry, 7);
        assert!(report.weeks[0].has_data());
        assert!(!report.weeks[1].has_data());
        assert_eq!(report.weeks_with_data(), 1);
    }

    #[tokio::test]
    async fn empty_chain_becomes_no_data_week() {
        let use_case = AnalyzeSymbolUseCase::new(Arc::new(feed()), &Config::default());
        let report = use_case.execute("AAPL", now()).await.unwrap();

        let week2 = &report.weeks[1];
        assert_eq!(week2.week_number, 2);
        assert_eq!(week2.unavailable.as_deref(), Some("empty option chain"));
        assert!(week2.best_pick.is_none());
    }

    #[tokio::test]
    async fn unknown_symbol_fails() {
        let use_case = AnalyzeSymbolUseCase::new(Arc::new(feed()), &Config::default());
        let Err(err) = use_case.execute("MSFT", now()).await else {
            panic!("expected quote error");
        };
        assert!(matches!(err, AnalysisError::Quote { .. }));
    }

    #[tokio::test]
    async fn respects_week_limit() {
        let mut config = Config::default();
        config.analysis.weeks = 1;
        let use_case = AnalyzeSymbolUseCase::new(Arc::new(feed()), &config);
        let report = use_case.execute("AAPL", now()).await.unwrap();
        assert_eq!(report.weeks.len(), 1);
    }

    #[tokio::test]
    async fn no_upcoming_expirations_fails() {
        let feed = StaticMarketData::new();
        feed.set_price("AAPL", dec!(200));
        feed.set_chain("AAPL", date(2025, 8, 8), Vec::new());

        let use_case = AnalyzeSymbolUseCase::new(Arc::new(feed), &Config::default());
        let Err(err) = use_case.execute("AAPL", now()).await else {
            panic!("expected no expirations");
        };
        assert!(matches!(err, AnalysisError::NoExpirations { .. }));
    }
}
