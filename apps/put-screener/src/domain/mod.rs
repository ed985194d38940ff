//! Domain types.
//!
//! Everything here is created fresh for a single analysis run and discarded
//! afterwards. Nothing is persisted.

mod candidate;
mod quote;
mod report;

pub use candidate::{PremiumRiskRatio, QualityTier, RiskSource, ScoredCandidate, TierThresholds};
pub use quote::{CONTRACT_MULTIPLIER, OptionContract, Quote};
pub use report::{BestChoice, StockReport, WeeklyReport};
