//! Interval runner.
//!
//! Each cycle runs on its own task and is watched with a wall-clock budget.
//! A cycle that overruns is reported as timed out and left to finish in the
//! background; a cycle that panics is logged. Neither ends the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::MarketDataPort;
use crate::application::use_cases::{CycleSummary, RunCycleUseCase};
use crate::config::ScheduleConfig;
use crate::observability;

use super::market_hours::{MarketWindow, next_tick};

/// Result of one watched cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The cycle finished within its budget.
    Completed(CycleSummary),
    /// The budget ran out first.
    TimedOut,
    /// The cycle task panicked or was cancelled.
    Panicked(String),
    /// The trading window was closed.
    Skipped,
}

impl CycleOutcome {
    /// Metric label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::TimedOut => "timed_out",
            Self::Panicked(_) => "panicked",
            Self::Skipped => "skipped",
        }
    }

    /// Whether the cycle completed with at least one symbol analyzed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed(summary) if summary.succeeded())
    }
}

/// Runs analysis cycles once or on an interval.
pub struct Runner<M>
where
    M: MarketDataPort + 'static,
{
    cycle: Arc<RunCycleUseCase<M>>,
    window: MarketWindow,
    schedule: ScheduleConfig,
}

impl<M> Runner<M>
where
    M: MarketDataPort + 'static,
{
    /// Create a runner.
    #[must_use]
    pub fn new(cycle: Arc<RunCycleUseCase<M>>, schedule: ScheduleConfig) -> Self {
        Self {
            cycle,
            window: MarketWindow::from_config(&schedule),
            schedule,
        }
    }

    /// Run one cycle under the budget.
    pub async fn run_once(&self) -> CycleOutcome {
        let started = Instant::now();
        let budget = self.schedule.cycle_budget();
        let cycle = Arc::clone(&self.cycle);
        let mut handle = tokio::spawn(async move { cycle.execute(Utc::now()).await });

        let outcome = match tokio::time::timeout(budget, &mut handle).await {
            Ok(Ok(summary)) => CycleOutcome::Completed(summary),
            Ok(Err(e)) => {
                let message = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    e.to_string()
                };
                tracing::error!(error = %message, "Cycle task failed");
                CycleOutcome::Panicked(message)
            }
            Err(_) => {
                tracing::warn!(
                    budget_secs = budget.as_secs(),
                    "Cycle exceeded its budget, continuing in background"
                );
                CycleOutcome::TimedOut
            }
        };

        observability::record_cycle(outcome.label(), started.elapsed().as_secs_f64());
        outcome
    }

    /// Run one cycle if the trading window allows it.
    pub async fn tick(&self) -> CycleOutcome {
        if self.schedule.enforces_market_hours() && !self.window.is_open(Utc::now()) {
            tracing::info!("Outside market hours, skipping cycle");
            observability::record_cycle(CycleOutcome::Skipped.label(), 0.0);
            return CycleOutcome::Skipped;
        }
        self.run_once().await
    }

    /// Run cycles until `shutdown` is cancelled. The first cycle starts immediately.
    pub async fn run(&self, shutdown: CancellationToken) {
        tracing::info!(
            interval_minutes = self.schedule.interval_minutes,
            align_to_hour = self.schedule.align_to_hour,
            market_hours = self.schedule.enforces_market_hours(),
            symbols = ?self.cycle.symbols(),
            "Scheduler started"
        );

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                outcome = self.tick() => {
                    if let CycleOutcome::Completed(summary) = &outcome {
                        tracing::info!(
                            analyzed = summary.reports.len(),
                            failed = summary.failures.len(),
                            "Cycle finished"
                        );
                    }
                }
            }

            let now = Utc::now();
            let next = next_tick(now, self.schedule.interval(), self.schedule.align_to_hour);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(next = %next, "Sleeping until next cycle");

            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(wait) => {}
            }
        }

        tracing::info!("Scheduler stopped");
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "cycle panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MarketDataError;
    use crate::application::use_cases::AnalyzeSymbolUseCase;
    use crate::config::Config;
    use crate::domain::OptionContract;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    enum Behavior {
        Slow,
        Panic,
        Missing,
    }

    struct ScriptedFeed(Behavior);

    #[async_trait]
    impl MarketDataPort for ScriptedFeed {
        async fn current_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
            match self.0 {
                Behavior::Slow => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Decimal::ONE_HUNDRED)
                }
                Behavior::Panic => panic!("feed exploded"),
                Behavior::Missing => Err(MarketDataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
            }
        }

        async fn expirations(&self, _symbol: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
            Ok(Vec::new())
        }

        async fn option_chain(
            &self,
            _symbol: &str,
            _expiration: NaiveDate,
        ) -> Result<Vec<OptionContract>, MarketDataError> {
            Ok(Vec::new())
        }
    }

    fn runner(behavior: Behavior, schedule: ScheduleConfig) -> Runner<ScriptedFeed> {
        let config = Config::default();
        let analyze = AnalyzeSymbolUseCase::new(Arc::new(ScriptedFeed(behavior)), &config);
        let cycle = RunCycleUseCase::new(analyze, vec!["AAPL".to_string()]);
        Runner::new(Arc::new(cycle), schedule)
    }

    #[tokio::test(start_paused = true)]
    async fn overrunning_cycle_times_out() {
        let runner = runner(Behavior::Slow, ScheduleConfig::default());
        let outcome = runner.run_once().await;
        assert!(matches!(outcome, CycleOutcome::TimedOut));
        assert!(!outcome.succeeded());
    }

    #[test]
    fn only_completed_cycles_with_reports_succeed() {
        assert!(!CycleOutcome::TimedOut.succeeded());
        assert!(!CycleOutcome::Skipped.succeeded());
        assert!(!CycleOutcome::Panicked("boom".to_string()).succeeded());
        assert!(!CycleOutcome::Completed(CycleSummary::default()).succeeded());
    }

    #[tokio::test]
    async fn panicking_cycle_is_contained() {
        let runner = runner(Behavior::Panic, ScheduleConfig::default());
        let CycleOutcome::Panicked(message) = runner.run_once().await else {
            panic!("expected panicked outcome");
        };
        assert!(message.contains("feed exploded"));
        assert!(!CycleOutcome::Panicked(message).succeeded());
    }

    #[tokio::test]
    async fn failed_symbols_still_complete() {
        let runner = runner(Behavior::Missing, ScheduleConfig::default());
        let CycleOutcome::Completed(summary) = runner.run_once().await else {
            panic!("expected completed outcome");
        };
        assert!(!summary.succeeded());
        assert_eq!(summary.failures.len(), 1);
    }

    #[tokio::test]
    async fn ignoring_market_hours_always_runs() {
        let schedule = ScheduleConfig {
            ignore_market_hours: true,
            ..ScheduleConfig::default()
        };
        let runner = runner(Behavior::Missing, schedule);
        assert!(matches!(runner.tick().await, CycleOutcome::Completed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_stops_loop() {
        let schedule = ScheduleConfig {
            ignore_market_hours: true,
            ..ScheduleConfig::default()
        };
        let runner = runner(Behavior::Missing, schedule);
        let token = CancellationToken::new();
        token.cancel();
        // returns instead of sleeping for an hour
        runner.run(token).await;
    }
}
