//! Strike selection, tier thresholds and pick rules.

use serde::{Deserialize, Serialize};

use crate::domain::TierThresholds;
use crate::screening::StrikeSelection;

/// Screening configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// How target strikes are chosen.
    #[serde(default)]
    pub strike_selection: StrikeSelection,
    /// Quality tier thresholds.
    #[serde(default)]
    pub tiers: TierThresholds,
    /// Best picks must have an assignment probability strictly below this (percent).
    #[serde(default = "default_max_pick_risk")]
    pub max_pick_risk: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            strike_selection: StrikeSelection::default(),
            tiers: TierThresholds::default(),
            max_pick_risk: default_max_pick_risk(),
        }
    }
}

const fn default_max_pick_risk() -> f64 {
    20.0
}
