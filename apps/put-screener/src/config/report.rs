//! Report layout configuration.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::QualityTier;

/// Report layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rows per week in the full report.
    #[serde(default = "default_max_rows")]
    pub max_rows_per_week: usize,
    /// Rows per week in the compact report.
    #[serde(default = "default_compact_rows")]
    pub compact_rows_per_week: usize,
    /// Lowest tier shown in week tables.
    #[serde(default = "default_min_tier")]
    pub min_display_tier: QualityTier,
    /// Timezone for the analysis timestamp.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_rows_per_week: default_max_rows(),
            compact_rows_per_week: default_compact_rows(),
            min_display_tier: default_min_tier(),
            timezone: default_timezone(),
        }
    }
}

const fn default_max_rows() -> usize {
    10
}

const fn default_compact_rows() -> usize {
    5
}

const fn default_min_tier() -> QualityTier {
    QualityTier::Fair
}

pub(crate) const fn default_timezone() -> Tz {
    chrono_tz::America::New_York
}
