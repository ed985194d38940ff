//! Candidate scoring and ordering.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::config::{PricingConfig, ScreeningConfig};
use crate::domain::{
    CONTRACT_MULTIPLIER, OptionContract, PremiumRiskRatio, QualityTier, ScoredCandidate,
    TierThresholds,
};
use crate::pricing::RiskModel;

use super::strikes::StrikeSelection;

/// Display ordering of candidates within a week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RankingView {
    /// Highest premium first, then highest strike.
    #[default]
    Premium,
    /// Highest premium-to-risk ratio first (unbounded ratios on top), then highest premium.
    Quality,
}

/// Scores and orders the contracts of one expiration.
#[derive(Debug, Clone)]
pub struct CandidateRanker {
    selection: StrikeSelection,
    thresholds: TierThresholds,
    pricing: PricingConfig,
    risk_model: RiskModel,
}

impl CandidateRanker {
    /// Create a ranker from configuration.
    #[must_use]
    pub fn new(screening: &ScreeningConfig, pricing: &PricingConfig) -> Self {
        Self {
            selection: screening.strike_selection.clone(),
            thresholds: screening.tiers,
            pricing: pricing.clone(),
            risk_model: RiskModel::from_config(pricing),
        }
    }

    /// Replace the strike selection strategy.
    #[must_use]
    pub fn with_selection(mut self, selection: StrikeSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Score a single contract. Contracts without a positive premium yield `None`.
    #[must_use]
    pub fn score(
        &self,
        spot: Decimal,
        contract: &OptionContract,
        as_of: NaiveDate,
    ) -> Option<ScoredCandidate> {
        let premium = contract.premium()?;
        let days_to_expiry = contract.days_to_expiry(as_of);
        let volatility = self.pricing.volatility_for(contract.implied_volatility);

        let risk = self.risk_model.assess(
            spot.to_f64().unwrap_or(f64::NAN),
            contract.strike.to_f64().unwrap_or(f64::NAN),
            days_to_expiry,
            volatility,
        );

        let premium_per_contract = premium * CONTRACT_MULTIPLIER;
        let ratio = PremiumRiskRatio::from_parts(
            premium_per_contract.to_f64().unwrap_or(0.0),
            risk.probability,
        );

        Some(ScoredCandidate {
            contract: contract.clone(),
            days_to_expiry,
            premium,
            premium_per_contract,
            otm_amount: spot - contract.strike,
            daily_time_decay: premium / Decimal::from(days_to_expiry.max(1)),
            assignment_probability: risk.probability,
            premium_to_risk_ratio: ratio,
            quality_tier: QualityTier::classify(ratio, &self.thresholds),
            risk_source: risk.source,
            model_daily_theta: risk.daily_theta,
        })
    }

    /// Select, score and order the contracts of one expiration.
    #[must_use]
    pub fn rank(
        &self,
        spot: Decimal,
        contracts: &[OptionContract],
        as_of: NaiveDate,
        view: RankingView,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = self
            .selection
            .select(spot, contracts)
            .into_iter()
            .filter_map(|contract| self.score(spot, contract, as_of))
            .collect();

        sort_for_view(&mut scored, view);
        scored
    }
}

/// Order candidates for a ranking view.
pub fn sort_for_view(candidates: &mut [ScoredCandidate], view: RankingView) {
    match view {
        RankingView::Premium => candidates.sort_by(|a, b| {
            b.premium
                .cmp(&a.premium)
                .then_with(|| b.strike().cmp(&a.strike()))
        }),
        RankingView::Quality => candidates.sort_by(|a, b| {
            b.premium_to_risk_ratio
                .rank_cmp(&a.premium_to_risk_ratio)
                .then_with(|| b.premium.cmp(&a.premium))
                .then_with(|| b.strike().cmp(&a.strike()))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskSource;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 8).unwrap()
    }

    fn put(strike: Decimal, bid: Decimal, ask: Decimal) -> OptionContract {
        OptionContract {
            symbol: "AAPL".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            strike,
            bid,
            ask,
            last_price: Decimal::ZERO,
            implied_volatility: Some(0.30),
        }
    }

    fn ranker() -> CandidateRanker {
        CandidateRanker::new(&ScreeningConfig::default(), &PricingConfig::default())
    }

    #[test]
    fn score_derives_all_fields() {
        let c = put(dec!(195), dec!(1.00), dec!(1.20));
        let scored = ranker().score(dec!(200), &c, as_of()).unwrap();

        assert_eq!(scored.premium, dec!(1.10));
        assert_eq!(scored.premium_per_contract, dec!(110));
        assert_eq!(scored.otm_amount, dec!(5));
        assert_eq!(scored.days_to_expiry, 7);
        assert_eq!(scored.daily_time_decay, dec!(1.10) / dec!(7));
        assert_eq!(scored.risk_source, RiskSource::Model);
        assert!(scored.assignment_probability > 0.0 && scored.assignment_probability < 50.0);
        let PremiumRiskRatio::Finite(ratio) = scored.premium_to_risk_ratio else {
            panic!("expected finite ratio");
        };
        assert!((ratio - 110.0 / scored.assignment_probability).abs() < 1e-9);
    }

    #[test]
    fn same_day_expiry_uses_one_day_for_decay() {
        let mut c = put(dec!(190), dec!(0.40), dec!(0.60));
        c.expiration_date = as_of();
        let scored = ranker().score(dec!(200), &c, as_of()).unwrap();

        assert_eq!(scored.daily_time_decay, dec!(0.50));
        assert_eq!(scored.assignment_probability, 0.0);
        assert_eq!(scored.premium_to_risk_ratio, PremiumRiskRatio::Unbounded);
        assert_eq!(scored.quality_tier, QualityTier::Excellent);
    }

    #[test]
    fn unpriced_contracts_are_excluded() {
        let contracts = vec![
            put(dec!(198), dec!(0), dec!(0)),
            put(dec!(197), dec!(1.5), dec!(1.7)),
        ];
        let ranked = ranker()
            .with_selection(StrikeSelection::Explicit {
                strikes: vec![dec!(198), dec!(197)],
            })
            .rank(dec!(200), &contracts, as_of(), RankingView::Premium);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].strike(), dec!(197));
    }

    #[test]
    fn views_produce_distinct_orderings() {
        // Deeper OTM has the lower premium but the better ratio.
        let contracts = vec![
            put(dec!(199), dec!(3.00), dec!(3.20)),
            put(dec!(190), dec!(0.80), dec!(0.90)),
        ];
        let r = ranker().with_selection(StrikeSelection::Explicit {
            strikes: vec![dec!(199), dec!(190)],
        });

        let by_premium = r.rank(dec!(200), &contracts, as_of(), RankingView::Premium);
        assert_eq!(by_premium[0].strike(), dec!(199));

        let by_quality = r.rank(dec!(200), &contracts, as_of(), RankingView::Quality);
        assert_eq!(by_quality[0].strike(), dec!(190));
        assert!(
            by_quality[0].premium_to_risk_ratio > by_quality[1].premium_to_risk_ratio
        );
    }

    #[test]
    fn unbounded_ratio_sorts_first_in_quality_view() {
        let mut expiring = put(dec!(180), dec!(0.05), dec!(0.07));
        expiring.expiration_date = as_of();
        let live = put(dec!(195), dec!(2.00), dec!(2.10));

        let mut scored = vec![
            ranker().score(dec!(200), &live, as_of()).unwrap(),
            ranker().score(dec!(200), &expiring, as_of()).unwrap(),
        ];
        sort_for_view(&mut scored, RankingView::Quality);
        assert_eq!(scored[0].premium_to_risk_ratio, PremiumRiskRatio::Unbounded);
    }

    proptest! {
        #[test]
        fn ratio_strictly_decreases_with_probability(
            premium in 1.0f64..5_000.0,
            p in 0.01f64..99.0,
            bump in 0.01f64..1.0,
        ) {
            let lower = PremiumRiskRatio::from_parts(premium, p);
            let higher = PremiumRiskRatio::from_parts(premium, p + bump);
            prop_assert!(lower > higher);
        }
    }
}
