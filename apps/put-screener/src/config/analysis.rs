//! Which symbols and expirations a run covers.

use serde::{Deserialize, Serialize};

use crate::screening::RankingView;

/// Analysis scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Ticker symbols, analyzed in order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    /// Number of nearest expirations to analyze per symbol.
    #[serde(default = "default_weeks")]
    pub weeks: usize,
    /// Candidate ordering within each week.
    #[serde(default)]
    pub view: RankingView,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            weeks: default_weeks(),
            view: RankingView::default(),
        }
    }
}

fn default_symbols() -> Vec<String> {
    ["AAPL", "NVDA", "GOOG", "GOOGL"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

const fn default_weeks() -> usize {
    4
}
