//! Per-expiration and per-symbol analysis results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::candidate::ScoredCandidate;
use super::quote::Quote;

/// Analysis of a single expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// Display label ("Week 1", "Week 2", ...).
    pub label: String,
    /// Position among the analyzed expirations, starting at 1.
    pub week_number: usize,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// Calendar days from the analysis date to expiration.
    pub days_to_expiry: i64,
    /// Candidates in display order for the configured ranking view.
    pub candidates: Vec<ScoredCandidate>,
    /// Highest-premium candidate under the risk ceiling, if any.
    pub best_pick: Option<ScoredCandidate>,
    /// Why no candidates are available, when the chain could not be used.
    pub unavailable: Option<String>,
}

impl WeeklyReport {
    /// Build a report for an expiration that was analyzed.
    #[must_use]
    pub fn analyzed(
        week_number: usize,
        expiration_date: NaiveDate,
        days_to_expiry: i64,
        candidates: Vec<ScoredCandidate>,
        best_pick: Option<ScoredCandidate>,
    ) -> Self {
        Self {
            label: format!("Week {week_number}"),
            week_number,
            expiration_date,
            days_to_expiry,
            candidates,
            best_pick,
            unavailable: None,
        }
    }

    /// Build a report for an expiration whose data could not be used.
    #[must_use]
    pub fn no_data(
        week_number: usize,
        expiration_date: NaiveDate,
        days_to_expiry: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            label: format!("Week {week_number}"),
            week_number,
            expiration_date,
            days_to_expiry,
            candidates: Vec::new(),
            best_pick: None,
            unavailable: Some(reason.into()),
        }
    }

    /// Whether any candidate was scored for this expiration.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.unavailable.is_none() && !self.candidates.is_empty()
    }
}

/// The single best pick across all analyzed expirations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestChoice {
    /// Week the pick comes from.
    pub week_number: usize,
    /// Label of that week.
    pub week_label: String,
    /// Expiration date of that week.
    pub expiration_date: NaiveDate,
    /// The candidate itself.
    pub candidate: ScoredCandidate,
}

/// Complete analysis of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    /// Ticker symbol.
    pub symbol: String,
    /// Quote the analysis was based on.
    pub quote: Quote,
    /// One entry per analyzed expiration, nearest first.
    pub weeks: Vec<WeeklyReport>,
    /// Best pick across all weeks.
    pub absolute_best: Option<BestChoice>,
}

impl StockReport {
    /// Number of weeks that produced candidates.
    #[must_use]
    pub fn weeks_with_data(&self) -> usize {
        self.weeks.iter().filter(|w| w.has_data()).count()
    }
}
