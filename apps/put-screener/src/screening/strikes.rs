//! Strike selection strategies.
//!
//! A strategy turns a spot price and the listed contracts of one expiration
//! into the contracts worth scoring. Target-based strategies map every target
//! strike to the closest listed strike; a listed strike is returned at most
//! once no matter how many targets land on it.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::OptionContract;

/// One run of evenly spaced strikes in a ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderSegment {
    /// Number of strikes in this segment.
    pub count: u32,
    /// Dollar spacing between consecutive strikes.
    pub spacing: Decimal,
}

/// How target strikes are chosen relative to spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StrikeSelection {
    /// Walk down from `floor(spot - start_offset)` through each segment.
    Ladder {
        /// Dollars below spot where the ladder starts.
        #[serde(default = "default_start_offset")]
        start_offset: Decimal,
        /// Segments walked in order; each continues where the previous stopped.
        #[serde(default = "default_segments")]
        segments: Vec<LadderSegment>,
    },
    /// Fixed list of target strikes.
    Explicit {
        /// Target strikes.
        strikes: Vec<Decimal>,
    },
    /// Every listed strike within `below` dollars under spot, nearest first.
    Window {
        /// Dollars below spot to include.
        below: Decimal,
        /// Maximum number of strikes kept.
        max_strikes: usize,
    },
}

impl Default for StrikeSelection {
    fn default() -> Self {
        Self::Ladder {
            start_offset: default_start_offset(),
            segments: default_segments(),
        }
    }
}

fn default_start_offset() -> Decimal {
    Decimal::TWO
}

/// Ten strikes $1 apart, then five strikes $2 apart.
fn default_segments() -> Vec<LadderSegment> {
    vec![
        LadderSegment {
            count: 10,
            spacing: Decimal::ONE,
        },
        LadderSegment {
            count: 5,
            spacing: Decimal::TWO,
        },
    ]
}

impl StrikeSelection {
    /// Check the strategy parameters.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Ladder {
                start_offset,
                segments,
            } => {
                if start_offset.is_sign_negative() {
                    return Err("strike_selection.start_offset must not be negative".to_string());
                }
                if segments.is_empty() || segments.iter().all(|s| s.count == 0) {
                    return Err("strike_selection.segments must contain strikes".to_string());
                }
                if segments.iter().any(|s| s.spacing <= Decimal::ZERO) {
                    return Err("strike_selection.segments spacing must be positive".to_string());
                }
            }
            Self::Explicit { strikes } => {
                if strikes.is_empty() {
                    return Err("strike_selection.strikes must not be empty".to_string());
                }
            }
            Self::Window { below, max_strikes } => {
                if *below <= Decimal::ZERO || *max_strikes == 0 {
                    return Err(
                        "strike_selection window needs positive below and max_strikes".to_string(),
                    );
                }
            }
        }
        Ok(())
    }

    /// Target strikes for a spot price, highest first. Non-positive targets are dropped.
    ///
    /// `Window` has no targets; it selects listed strikes directly.
    #[must_use]
    pub fn target_strikes(&self, spot: Decimal) -> Vec<Decimal> {
        let mut targets = match self {
            Self::Ladder {
                start_offset,
                segments,
            } => {
                let mut cursor = (spot - *start_offset).floor();
                let mut targets = Vec::new();
                for segment in segments {
                    for _ in 0..segment.count {
                        targets.push(cursor);
                        cursor -= segment.spacing;
                    }
                }
                targets
            }
            Self::Explicit { strikes } => strikes.clone(),
            Self::Window { .. } => Vec::new(),
        };

        targets.retain(|t| *t > Decimal::ZERO);
        targets.sort_by(|a, b| b.cmp(a));
        targets.dedup();
        targets
    }

    /// Contracts to score, highest strike first, each listed strike at most once.
    #[must_use]
    pub fn select<'a>(&self, spot: Decimal, contracts: &'a [OptionContract]) -> Vec<&'a OptionContract> {
        let mut seen = BTreeSet::new();
        let mut selected: Vec<&OptionContract> = match self {
            Self::Window { below, max_strikes } => {
                let floor = spot - *below;
                let mut in_window: Vec<&OptionContract> = contracts
                    .iter()
                    .filter(|c| c.strike >= floor && c.strike <= spot)
                    .collect();
                in_window.sort_by(|a, b| {
                    (spot - a.strike)
                        .abs()
                        .cmp(&(spot - b.strike).abs())
                        .then(a.strike.cmp(&b.strike))
                });
                in_window
                    .into_iter()
                    .filter(|c| seen.insert(c.strike))
                    .take(*max_strikes)
                    .collect()
            }
            _ => self
                .target_strikes(spot)
                .into_iter()
                .filter_map(|target| closest_contract(target, contracts))
                .filter(|c| seen.insert(c.strike))
                .collect(),
        };

        selected.sort_by(|a, b| b.strike.cmp(&a.strike));
        selected
    }
}

/// Listed contract whose strike is closest to `target`. Ties go to the lower strike.
#[must_use]
pub fn closest_contract(target: Decimal, contracts: &[OptionContract]) -> Option<&OptionContract> {
    contracts.iter().min_by(|a, b| {
        (a.strike - target)
            .abs()
            .cmp(&(b.strike - target).abs())
            .then(a.strike.cmp(&b.strike))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn chain(strikes: &[Decimal]) -> Vec<OptionContract> {
        strikes
            .iter()
            .map(|&strike| OptionContract {
                symbol: "NVDA".to_string(),
                expiration_date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
                strike,
                bid: dec!(1),
                ask: dec!(1.1),
                last_price: dec!(1),
                implied_volatility: None,
            })
            .collect()
    }

    #[test]
    fn default_ladder_matches_one_then_two_dollar_steps() {
        let targets = StrikeSelection::default().target_strikes(dec!(180.42));
        let expected: Vec<Decimal> = vec![
            dec!(178), dec!(177), dec!(176), dec!(175), dec!(174),
            dec!(173), dec!(172), dec!(171), dec!(170), dec!(169),
            dec!(168), dec!(166), dec!(164), dec!(162), dec!(160),
        ];
        assert_eq!(targets, expected);
    }

    #[test]
    fn ladder_drops_non_positive_targets() {
        let targets = StrikeSelection::default().target_strikes(dec!(8.5));
        assert_eq!(targets.first(), Some(&dec!(6)));
        assert!(targets.iter().all(|t| *t > Decimal::ZERO));
        assert_eq!(targets.len(), 6);
    }

    #[test]
    fn closest_prefers_lower_strike_on_tie() {
        let contracts = chain(&[dec!(195), dec!(200)]);
        let picked = closest_contract(dec!(197.5), &contracts).unwrap();
        assert_eq!(picked.strike, dec!(195));
    }

    #[test]
    fn targets_mapping_to_same_strike_are_deduplicated() {
        // Listed strikes are $5 apart, so 199..196 all land on 200 or 195.
        let contracts = chain(&[dec!(190), dec!(195), dec!(200)]);
        let selection = StrikeSelection::Explicit {
            strikes: vec![dec!(199), dec!(198), dec!(197), dec!(196)],
        };

        let selected = selection.select(dec!(201), &contracts);
        let strikes: Vec<Decimal> = selected.iter().map(|c| c.strike).collect();
        assert_eq!(strikes, vec![dec!(200), dec!(195)]);
    }

    #[test]
    fn window_keeps_nearest_strikes_below_spot() {
        let contracts = chain(&[dec!(185), dec!(190), dec!(195), dec!(200), dec!(205)]);
        let selection = StrikeSelection::Window {
            below: dec!(12),
            max_strikes: 2,
        };

        let selected = selection.select(dec!(201), &contracts);
        let strikes: Vec<Decimal> = selected.iter().map(|c| c.strike).collect();
        assert_eq!(strikes, vec![dec!(200), dec!(195)]);
    }

    #[test]
    fn empty_chain_selects_nothing() {
        assert!(StrikeSelection::default().select(dec!(100), &[]).is_empty());
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(StrikeSelection::Explicit { strikes: vec![] }.validate().is_err());
        assert!(
            StrikeSelection::Window {
                below: dec!(0),
                max_strikes: 3
            }
            .validate()
            .is_err()
        );
        assert!(
            StrikeSelection::Ladder {
                start_offset: dec!(2),
                segments: vec![LadderSegment {
                    count: 3,
                    spacing: dec!(0)
                }],
            }
            .validate()
            .is_err()
        );
        assert!(StrikeSelection::default().validate().is_ok());
    }
}
