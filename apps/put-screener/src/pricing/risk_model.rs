//! Assignment probability for short puts.
//!
//! The primary path reads the probability off the Black-Scholes put delta.
//! When pricing fails, a distance-from-spot heuristic takes over so a
//! probability is always available. Both paths return a finite value in
//! `[0, 100]`.

use crate::config::PricingConfig;
use crate::domain::RiskSource;
use crate::observability;

use super::black_scholes::{self, PutInputs};

/// Calendar days per year used to annualize time to expiry.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Result of a single risk assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    /// Probability of assignment in percent.
    pub probability: f64,
    /// Which path produced the probability.
    pub source: RiskSource,
    /// Absolute model theta per calendar day, when the model path ran.
    pub daily_theta: Option<f64>,
}

/// Assignment risk model parameterized by rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskModel {
    risk_free_rate: f64,
    dividend_yield: f64,
}

impl Default for RiskModel {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl RiskModel {
    /// Create a model with explicit rates.
    #[must_use]
    pub const fn new(risk_free_rate: f64, dividend_yield: f64) -> Self {
        Self {
            risk_free_rate,
            dividend_yield,
        }
    }

    /// Create a model from pricing configuration.
    #[must_use]
    pub const fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.risk_free_rate, config.dividend_yield)
    }

    /// Annualized risk-free rate used by the model.
    #[must_use]
    pub const fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Assess a short put. Never fails.
    #[must_use]
    pub fn assess(&self, spot: f64, strike: f64, days_to_expiry: i64, volatility: f64) -> RiskAssessment {
        if days_to_expiry <= 0 {
            // NaN comparisons are false, so unusable prices settle as assigned.
            let probability = if spot > strike { 0.0 } else { 100.0 };
            return RiskAssessment {
                probability,
                source: RiskSource::Expired,
                daily_theta: None,
            };
        }

        let inputs = PutInputs {
            spot,
            strike,
            years: days_to_expiry as f64 / DAYS_PER_YEAR,
            rate: self.risk_free_rate,
            dividend_yield: self.dividend_yield,
            volatility,
        };

        match black_scholes::put_greeks(&inputs) {
            Ok(greeks) => RiskAssessment {
                probability: (greeks.delta.abs() * 100.0).clamp(0.0, 100.0),
                source: RiskSource::Model,
                daily_theta: Some((greeks.theta / DAYS_PER_YEAR).abs()),
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    spot,
                    strike,
                    days_to_expiry,
                    volatility,
                    "Pricing failed, using distance heuristic for assignment risk"
                );
                observability::record_risk_fallback();
                RiskAssessment {
                    probability: fallback_probability(spot, strike),
                    source: RiskSource::Fallback,
                    daily_theta: None,
                }
            }
        }
    }
}

/// Probability of assignment in percent for a short put.
///
/// Uses the Black-Scholes put delta with no dividend yield, falling back to
/// [`fallback_probability`] when pricing fails.
#[must_use]
pub fn assignment_probability(
    spot: f64,
    strike: f64,
    days_to_expiry: i64,
    volatility: f64,
    risk_free_rate: f64,
) -> f64 {
    RiskModel::new(risk_free_rate, 0.0)
        .assess(spot, strike, days_to_expiry, volatility)
        .probability
}

/// Distance-from-spot heuristic.
///
/// With `distance = (strike - spot) / spot * 100`:
/// strikes above spot map to `min(90, 20 + 2 * distance)`, strikes at or below
/// spot map to `max(1, 20 + 3 * distance)`. Non-increasing as the strike falls.
/// Unusable prices yield 100.
#[must_use]
pub fn fallback_probability(spot: f64, strike: f64) -> f64 {
    if !spot.is_finite() || !strike.is_finite() || spot <= 0.0 {
        return 100.0;
    }

    let distance = (strike - spot) / spot * 100.0;
    let probability = if distance > 0.0 {
        (20.0 + 2.0 * distance).min(90.0)
    } else {
        (20.0 + 3.0 * distance).max(1.0)
    };

    probability.clamp(0.0, 100.0)
}
