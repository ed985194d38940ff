//! Scheduled execution: trading window, tick computation and the runner.

mod market_hours;
mod runner;

pub use market_hours::{MarketWindow, next_tick};
pub use runner::{CycleOutcome, Runner};
