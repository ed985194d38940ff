// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Put Screener - Core Library
//!
//! Screens out-of-the-money puts for premium selling. A run fetches a quote and
//! the nearest option chains, scores every candidate strike by premium per unit
//! of assignment risk, renders the result and pushes it to notification channels.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: quotes, contracts, scored candidates and reports
//! - **Pricing**: Black-Scholes put Greeks and the assignment risk model
//! - **Screening**: strike selection, scoring, ranking and best-pick rules
//! - **Report**: full, compact and SMS renderings plus length bounding
//! - **Application**: ports for external systems and the analysis use cases
//! - **Infrastructure**: Yahoo Finance market data and notification channels
//! - **Scheduler**: market-hours window and the interval runner
//!
//! Configuration lives in [`config`], logging and metrics in [`observability`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Layers
// =============================================================================

/// Domain layer - value types shared by every other layer.
pub mod domain;

/// Option pricing and assignment risk.
pub mod pricing;

/// Strike selection and candidate ranking.
pub mod screening;

/// Text rendering of stock reports.
pub mod report;

/// Application layer - use cases and port definitions.
pub mod application;

/// Infrastructure layer - adapters for market data and notifications.
pub mod infrastructure;

/// Scheduled execution.
pub mod scheduler;

/// YAML configuration loading and validation.
pub mod config;

/// Logging and Prometheus metrics.
pub mod observability;

/// Command-line interface definition.
pub mod cli;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::{
    BestChoice, OptionContract, PremiumRiskRatio, QualityTier, Quote, RiskSource,
    ScoredCandidate, StockReport, TierThresholds, WeeklyReport,
};
pub use pricing::{RiskAssessment, RiskModel, assignment_probability};
pub use report::{ReportFormatter, ReportOptions, bounded, format};
pub use screening::{CandidateRanker, RankingView, StrikeSelection};
