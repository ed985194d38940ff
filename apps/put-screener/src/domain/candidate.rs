//! Scored put candidates and their quality classification.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quote::OptionContract;

// ============================================================================
// Premium-to-Risk Ratio
// ============================================================================

/// Contract premium in dollars earned per percentage point of assignment risk.
///
/// A probability of zero has no finite ratio. It is represented as
/// [`PremiumRiskRatio::Unbounded`], which ranks above every finite value and
/// is never folded into numeric aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PremiumRiskRatio {
    /// `premium_per_contract / assignment_probability`.
    Finite(f64),
    /// Assignment probability was zero.
    Unbounded,
}

impl PremiumRiskRatio {
    /// Build the ratio from a per-contract premium and a probability in percent.
    #[must_use]
    pub fn from_parts(premium_per_contract: f64, assignment_probability: f64) -> Self {
        if assignment_probability > 0.0 {
            Self::Finite(premium_per_contract / assignment_probability)
        } else {
            Self::Unbounded
        }
    }

    /// Numeric value, if finite.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(v),
            Self::Unbounded => None,
        }
    }

    /// Total order used for ranking: `Unbounded` above all finite values.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
            (Self::Unbounded, Self::Finite(_)) => Ordering::Greater,
            (Self::Finite(_), Self::Unbounded) => Ordering::Less,
            (Self::Finite(a), Self::Finite(b)) => a.total_cmp(b),
        }
    }
}

impl PartialOrd for PremiumRiskRatio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.rank_cmp(other))
    }
}

impl fmt::Display for PremiumRiskRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v:.1}"),
            Self::Unbounded => write!(f, "∞"),
        }
    }
}

// ============================================================================
// Quality Tiers
// ============================================================================

/// Inclusive lower bounds on the premium-to-risk ratio for each tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Ratio at or above which a candidate is EXCELLENT.
    #[serde(default = "default_excellent")]
    pub excellent: f64,
    /// Ratio at or above which a candidate is GOOD.
    #[serde(default = "default_good")]
    pub good: f64,
    /// Ratio at or above which a candidate is FAIR.
    #[serde(default = "default_fair")]
    pub fair: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            good: default_good(),
            fair: default_fair(),
        }
    }
}

const fn default_excellent() -> f64 {
    15.0
}

const fn default_good() -> f64 {
    10.0
}

const fn default_fair() -> f64 {
    5.0
}

/// Quality band of a candidate. Variants are ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTier {
    /// Below the FAIR threshold.
    Risky,
    /// Moderate premium versus risk.
    Fair,
    /// Decent premium for the risk taken.
    Good,
    /// High premium per unit of risk.
    Excellent,
}

impl QualityTier {
    /// Classify a ratio against the given thresholds.
    #[must_use]
    pub fn classify(ratio: PremiumRiskRatio, thresholds: &TierThresholds) -> Self {
        match ratio {
            PremiumRiskRatio::Unbounded => Self::Excellent,
            PremiumRiskRatio::Finite(r) if r >= thresholds.excellent => Self::Excellent,
            PremiumRiskRatio::Finite(r) if r >= thresholds.good => Self::Good,
            PremiumRiskRatio::Finite(r) if r >= thresholds.fair => Self::Fair,
            PremiumRiskRatio::Finite(_) => Self::Risky,
        }
    }

    /// Upper-case label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Risky => "RISKY",
        }
    }

    /// Colour band shown next to the label.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Excellent => "🟢",
            Self::Good => "🟡",
            Self::Fair => "🟠",
            Self::Risky => "🔴",
        }
    }

    /// One-line explanation of the band.
    #[must_use]
    pub const fn explanation(self) -> &'static str {
        match self {
            Self::Excellent => "High premium per unit of risk",
            Self::Good => "Decent premium for the risk taken",
            Self::Fair => "Moderate premium vs risk",
            Self::Risky => "Low premium for the risk",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Scored Candidate
// ============================================================================

/// Which path of the risk model produced a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSource {
    /// Black-Scholes put delta.
    Model,
    /// Distance-from-spot heuristic after a pricing failure.
    Fallback,
    /// Contract at or past expiry, settled by moneyness.
    Expired,
}

/// A put contract with all screening metrics attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The underlying contract.
    pub contract: OptionContract,
    /// Calendar days until expiration.
    pub days_to_expiry: i64,
    /// Premium per share.
    pub premium: Decimal,
    /// Premium for one contract (premium × 100).
    pub premium_per_contract: Decimal,
    /// `spot - strike`; positive when the put is out of the money.
    pub otm_amount: Decimal,
    /// Premium per share divided by `max(days_to_expiry, 1)`.
    pub daily_time_decay: Decimal,
    /// Probability of assignment in percent, within `[0, 100]`.
    pub assignment_probability: f64,
    /// Premium per contract per percentage point of assignment risk.
    pub premium_to_risk_ratio: PremiumRiskRatio,
    /// Tier derived from the ratio.
    pub quality_tier: QualityTier,
    /// Which risk model path produced the probability.
    pub risk_source: RiskSource,
    /// Model theta per calendar day (absolute value), when the model path ran.
    pub model_daily_theta: Option<f64>,
}

impl ScoredCandidate {
    /// Strike of the underlying contract.
    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.contract.strike
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(15.0, QualityTier::Excellent ; "fifteen is excellent")]
    #[test_case(14.999, QualityTier::Good ; "just under fifteen is good")]
    #[test_case(10.0, QualityTier::Good ; "ten is good")]
    #[test_case(9.999, QualityTier::Fair ; "just under ten is fair")]
    #[test_case(5.0, QualityTier::Fair ; "five is fair")]
    #[test_case(4.999, QualityTier::Risky ; "just under five is risky")]
    #[test_case(0.0, QualityTier::Risky ; "zero is risky")]
    fn tier_boundaries_are_inclusive(ratio: f64, expected: QualityTier) {
        let tier = QualityTier::classify(PremiumRiskRatio::Finite(ratio), &TierThresholds::default());
        assert_eq!(tier, expected);
    }

    #[test]
    fn unbounded_ratio_is_excellent() {
        let tier = QualityTier::classify(PremiumRiskRatio::Unbounded, &TierThresholds::default());
        assert_eq!(tier, QualityTier::Excellent);
    }

    #[test]
    fn custom_thresholds_shift_tiers() {
        let thresholds = TierThresholds {
            excellent: 30.0,
            good: 20.0,
            fair: 10.0,
        };
        assert_eq!(
            QualityTier::classify(PremiumRiskRatio::Finite(15.0), &thresholds),
            QualityTier::Fair
        );
    }

    #[test]
    fn zero_probability_is_unbounded() {
        assert_eq!(
            PremiumRiskRatio::from_parts(150.0, 0.0),
            PremiumRiskRatio::Unbounded
        );
        assert_eq!(
            PremiumRiskRatio::from_parts(150.0, 10.0),
            PremiumRiskRatio::Finite(15.0)
        );
    }

    #[test]
    fn unbounded_ranks_above_finite() {
        let big = PremiumRiskRatio::Finite(1e9);
        assert_eq!(
            PremiumRiskRatio::Unbounded.rank_cmp(&big),
            Ordering::Greater
        );
        assert!(big < PremiumRiskRatio::Unbounded);
        assert!(PremiumRiskRatio::Finite(2.0) > PremiumRiskRatio::Finite(1.0));
    }

    #[test]
    fn ratio_display() {
        assert_eq!(PremiumRiskRatio::Finite(12.345).to_string(), "12.3");
        assert_eq!(PremiumRiskRatio::Unbounded.to_string(), "∞");
    }

    #[test]
    fn tiers_order_worst_to_best() {
        assert!(QualityTier::Excellent > QualityTier::Good);
        assert!(QualityTier::Good > QualityTier::Fair);
        assert!(QualityTier::Fair > QualityTier::Risky);
    }
}
