//! Best-pick rules.

use crate::domain::{BestChoice, ScoredCandidate, WeeklyReport};

/// Highest-premium candidate with assignment probability strictly below `max_risk`.
///
/// Ties on premium go to the higher strike. `None` when nothing qualifies.
#[must_use]
pub fn best_pick(candidates: &[ScoredCandidate], max_risk: f64) -> Option<&ScoredCandidate> {
    candidates
        .iter()
        .filter(|c| c.assignment_probability < max_risk)
        .max_by(|a, b| {
            a.premium
                .cmp(&b.premium)
                .then_with(|| a.strike().cmp(&b.strike()))
        })
}

/// Highest-premium weekly best pick. Ties go to the earliest week.
#[must_use]
pub fn absolute_best(weeks: &[WeeklyReport]) -> Option<BestChoice> {
    let mut best: Option<(&WeeklyReport, &ScoredCandidate)> = None;

    for week in weeks {
        let Some(pick) = week.best_pick.as_ref() else {
            continue;
        };
        let better = best.is_none_or(|(_, current)| pick.premium > current.premium);
        if better {
            best = Some((week, pick));
        }
    }

    best.map(|(week, pick)| BestChoice {
        week_number: week.week_number,
        week_label: week.label.clone(),
        expiration_date: week.expiration_date,
        candidate: pick.clone(),
    })
}

/// Weekly best picks ordered by quality tier, then premium, then week.
#[must_use]
pub fn weekly_summary(weeks: &[WeeklyReport]) -> Vec<(&WeeklyReport, &ScoredCandidate)> {
    let mut picks: Vec<(&WeeklyReport, &ScoredCandidate)> = weeks
        .iter()
        .filter_map(|w| w.best_pick.as_ref().map(|p| (w, p)))
        .collect();

    picks.sort_by(|(wa, a), (wb, b)| {
        b.quality_tier
            .cmp(&a.quality_tier)
            .then_with(|| b.premium.cmp(&a.premium))
            .then_with(|| wa.week_number.cmp(&wb.week_number))
    });
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        OptionContract, PremiumRiskRatio, QualityTier, RiskSource, TierThresholds,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn candidate(strike: Decimal, premium: Decimal, probability: f64) -> ScoredCandidate {
        let per_contract = premium * dec!(100);
        let ratio = PremiumRiskRatio::from_parts(
            rust_decimal::prelude::ToPrimitive::to_f64(&per_contract).unwrap(),
            probability,
        );
        ScoredCandidate {
            contract: OptionContract {
                symbol: "GOOG".to_string(),
                expiration_date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
                strike,
                bid: premium,
                ask: premium,
                last_price: premium,
                implied_volatility: None,
            },
            days_to_expiry: 7,
            premium,
            premium_per_contract: per_contract,
            otm_amount: dec!(200) - strike,
            daily_time_decay: premium / dec!(7),
            assignment_probability: probability,
            premium_to_risk_ratio: ratio,
            quality_tier: QualityTier::classify(ratio, &TierThresholds::default()),
            risk_source: RiskSource::Model,
            model_daily_theta: None,
        }
    }

    fn week(number: usize, best: Option<ScoredCandidate>) -> WeeklyReport {
        let date = NaiveDate::from_ymd_opt(2025, 8, 8).unwrap() + chrono::Days::new(7 * number as u64);
        let candidates = best.iter().cloned().collect();
        WeeklyReport::analyzed(number, date, 7 * number as i64, candidates, best)
    }

    #[test]
    fn best_pick_is_highest_premium_under_ceiling() {
        let candidates = vec![
            candidate(dec!(199), dec!(3.00), 45.0),
            candidate(dec!(195), dec!(1.40), 19.9),
            candidate(dec!(192), dec!(0.90), 12.0),
        ];
        let pick = best_pick(&candidates, 20.0).unwrap();
        assert_eq!(pick.strike(), dec!(195));
    }

    #[test]
    fn ceiling_is_exclusive() {
        let candidates = vec![candidate(dec!(195), dec!(1.40), 20.0)];
        assert!(best_pick(&candidates, 20.0).is_none());
    }

    #[test]
    fn premium_tie_goes_to_higher_strike() {
        let candidates = vec![
            candidate(dec!(190), dec!(1.00), 8.0),
            candidate(dec!(192), dec!(1.00), 10.0),
        ];
        assert_eq!(best_pick(&candidates, 20.0).unwrap().strike(), dec!(192));
    }

    #[test]
    fn absolute_best_skips_weeks_without_pick() {
        let weeks = vec![
            week(1, None),
            week(2, Some(candidate(dec!(195), dec!(1.20), 15.0))),
            week(3, Some(candidate(dec!(190), dec!(1.80), 18.0))),
        ];
        let best = absolute_best(&weeks).unwrap();
        assert_eq!(best.week_number, 3);
        assert_eq!(best.week_label, "Week 3");
        assert_eq!(best.candidate.strike(), dec!(190));
    }

    #[test]
    fn absolute_best_tie_goes_to_earliest_week() {
        let weeks = vec![
            week(1, Some(candidate(dec!(195), dec!(1.50), 15.0))),
            week(2, Some(candidate(dec!(190), dec!(1.50), 12.0))),
        ];
        assert_eq!(absolute_best(&weeks).unwrap().week_number, 1);
    }

    #[test]
    fn absolute_best_none_when_no_week_qualifies() {
        let weeks = vec![week(1, None), week(2, None)];
        assert!(absolute_best(&weeks).is_none());
    }

    #[test]
    fn summary_orders_by_tier_then_premium() {
        let weeks = vec![
            // ratio 100/10 = 10 -> GOOD
            week(1, Some(candidate(dec!(195), dec!(1.00), 10.0))),
            // ratio 90/5 = 18 -> EXCELLENT
            week(2, Some(candidate(dec!(190), dec!(0.90), 5.0))),
            // ratio 200/19 = 10.5 -> GOOD, higher premium
            week(3, Some(candidate(dec!(196), dec!(2.00), 19.0))),
        ];
        let order: Vec<usize> = weekly_summary(&weeks)
            .iter()
            .map(|(w, _)| w.week_number)
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
