//! Run Cycle Use Case
//!
//! One pass over the configured symbols: analyze each, optionally dispatch
//! its report, and collect the outcome. Symbols are processed sequentially;
//! a failing symbol is logged and skipped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::application::ports::MarketDataPort;
use crate::application::services::{DispatchReport, NotificationDispatcher};
use crate::domain::StockReport;
use crate::observability;

use super::analyze_symbol::AnalyzeSymbolUseCase;

/// A symbol whose analysis failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFailure {
    /// Symbol.
    pub symbol: String,
    /// Error description.
    pub error: String,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    /// Reports for symbols that were analyzed.
    pub reports: Vec<StockReport>,
    /// Symbols that could not be analyzed.
    pub failures: Vec<SymbolFailure>,
    /// Dispatch results, one per report, when notifying.
    pub deliveries: Vec<DispatchReport>,
}

impl CycleSummary {
    /// At least one symbol produced a report.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.reports.is_empty()
    }

    /// Reports that reached at least one channel.
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.delivered()).count()
    }
}

/// Use case for one analysis cycle.
pub struct RunCycleUseCase<M>
where
    M: MarketDataPort,
{
    analyze: AnalyzeSymbolUseCase<M>,
    dispatcher: Option<Arc<NotificationDispatcher>>,
    symbols: Vec<String>,
    symbol_delay: Duration,
}

impl<M> RunCycleUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a cycle that only analyzes.
    #[must_use]
    pub const fn new(analyze: AnalyzeSymbolUseCase<M>, symbols: Vec<String>) -> Self {
        Self {
            analyze,
            dispatcher: None,
            symbols,
            symbol_delay: Duration::ZERO,
        }
    }

    /// Dispatch every report, pausing `symbol_delay` between symbols.
    #[must_use]
    pub fn with_dispatcher(
        mut self,
        dispatcher: Arc<NotificationDispatcher>,
        symbol_delay: Duration,
    ) -> Self {
        self.dispatcher = Some(dispatcher);
        self.symbol_delay = symbol_delay;
        self
    }

    /// Symbols analyzed by this cycle.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Run the cycle as of `now`.
    pub async fn execute(&self, now: DateTime<Utc>) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for (index, symbol) in self.symbols.iter().enumerate() {
            if index > 0 && self.dispatcher.is_some() && !self.symbol_delay.is_zero() {
                tokio::time::sleep(self.symbol_delay).await;
            }

            let report = match self.analyze.execute(symbol, now).await {
                Ok(report) => {
                    observability::record_symbol_analyzed(symbol);
                    report
                }
                Err(e) => {
                    tracing::error!(symbol = %symbol, error = %e, "Symbol analysis failed");
                    observability::record_symbol_failed(symbol);
                    summary.failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(dispatcher) = &self.dispatcher {
                summary.deliveries.push(dispatcher.dispatch(&report).await);
            }
            summary.reports.push(report);
        }

        tracing::info!(
            analyzed = summary.reports.len(),
            failed = summary.failures.len(),
            delivered = summary.delivered_count(),
            "Cycle complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::OptionContract;
    use crate::infrastructure::marketdata::StaticMarketData;
    use crate::report::ReportFormatter;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 8, 14, 30, 0).unwrap()
    }

    fn feed() -> Arc<StaticMarketData> {
        let expiration = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        let feed = StaticMarketData::new();
        feed.set_price("AAPL", dec!(200));
        feed.set_chain(
            "AAPL",
            expiration,
            vec![OptionContract {
                symbol: "AAPL".to_string(),
                expiration_date: expiration,
                strike: dec!(195),
                bid: dec!(1.00),
                ask: dec!(1.10),
                last_price: dec!(1.05),
                implied_volatility: Some(0.3),
            }],
        );
        Arc::new(feed)
    }

    #[tokio::test]
    async fn failing_symbol_does_not_stop_cycle() {
        let config = Config::default();
        let analyze = AnalyzeSymbolUseCase::new(feed(), &config);
        let cycle = RunCycleUseCase::new(analyze, vec!["MISSING".to_string(), "AAPL".to_string()]);

        let summary = cycle.execute(now()).await;

        assert!(summary.succeeded());
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].symbol, "AAPL");
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].symbol, "MISSING");
        assert!(summary.deliveries.is_empty());
    }

    #[tokio::test]
    async fn all_symbols_failing_is_not_success() {
        let analyze = AnalyzeSymbolUseCase::new(feed(), &Config::default());
        let cycle = RunCycleUseCase::new(analyze, vec!["MISSING".to_string()]);

        let summary = cycle.execute(now()).await;
        assert!(!summary.succeeded());
    }

    #[tokio::test]
    async fn dispatches_each_report() {
        let config = Config::default();
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Vec::new(),
            ReportFormatter::default(),
            &config.notifications,
        ));
        let analyze = AnalyzeSymbolUseCase::new(feed(), &config);
        let cycle = RunCycleUseCase::new(analyze, vec!["AAPL".to_string()])
            .with_dispatcher(dispatcher, Duration::ZERO);

        let summary = cycle.execute(now()).await;

        assert_eq!(summary.deliveries.len(), 1);
        // no channels configured
        assert!(!summary.deliveries[0].delivered());
    }
}
