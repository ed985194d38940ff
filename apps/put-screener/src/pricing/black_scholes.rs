//! Black-Scholes put valuation.
//!
//! Closed-form European put price, delta and theta with a continuous
//! dividend yield. Inputs are validated up front; any non-finite output is
//! reported as an error so callers can fall back to a heuristic.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
// Financial formulas use standard notation where mul_add() obscures meaning
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use std::f64::consts::PI;

use thiserror::Error;

/// Errors from put valuation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Invalid input parameters.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },

    /// The computation produced NaN or infinity.
    #[error("Non-finite {quantity} from pricing model")]
    NonFinite {
        /// Which output was not finite.
        quantity: &'static str,
    },
}

/// Inputs to the put formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PutInputs {
    /// Spot price of the underlying.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry in years.
    pub years: f64,
    /// Annualized risk-free rate.
    pub rate: f64,
    /// Annualized continuous dividend yield.
    pub dividend_yield: f64,
    /// Annualized volatility.
    pub volatility: f64,
}

impl PutInputs {
    fn validate(&self) -> Result<(), PricingError> {
        let checks = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("years", self.years),
            ("volatility", self.volatility),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::InvalidInput {
                    message: format!("{name} must be finite and positive, got {value}"),
                });
            }
        }
        if !self.rate.is_finite() || !self.dividend_yield.is_finite() {
            return Err(PricingError::InvalidInput {
                message: "rate and dividend yield must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Put value and sensitivities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PutGreeks {
    /// Theoretical price.
    pub price: f64,
    /// Delta, in `[-1, 0]`.
    pub delta: f64,
    /// Theta per year (usually negative).
    pub theta: f64,
}

// ============================================================================
// Black-Scholes Helpers
// ============================================================================

/// Standard normal CDF (cumulative distribution function).
fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Standard normal PDF (probability density function).
fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter.
fn d1(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

// ============================================================================
// Public API
// ============================================================================

/// Price, delta and theta of a European put.
pub fn put_greeks(inputs: &PutInputs) -> Result<PutGreeks, PricingError> {
    inputs.validate()?;

    let PutInputs {
        spot: s,
        strike: k,
        years: t,
        rate: r,
        dividend_yield: q,
        volatility: sigma,
    } = *inputs;

    let d1 = d1(s, k, t, r, q, sigma);
    let d2 = d1 - sigma * t.sqrt();
    let disc_r = (-r * t).exp();
    let disc_q = (-q * t).exp();

    let price = k * disc_r * norm_cdf(-d2) - s * disc_q * norm_cdf(-d1);
    let delta = disc_q * (norm_cdf(d1) - 1.0);
    let theta = -(s * disc_q * norm_pdf(d1) * sigma) / (2.0 * t.sqrt())
        + r * k * disc_r * norm_cdf(-d2)
        - q * s * disc_q * norm_cdf(-d1);

    if !delta.is_finite() {
        return Err(PricingError::NonFinite { quantity: "delta" });
    }
    if !price.is_finite() {
        return Err(PricingError::NonFinite { quantity: "price" });
    }
    if !theta.is_finite() {
        return Err(PricingError::NonFinite { quantity: "theta" });
    }

    Ok(PutGreeks {
        price,
        delta,
        theta,
    })
}

/// Put delta alone.
pub fn put_delta(inputs: &PutInputs) -> Result<f64, PricingError> {
    put_greeks(inputs).map(|g| g.delta)
}
