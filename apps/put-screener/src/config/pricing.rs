//! Pricing model configuration for assignment risk.

use serde::{Deserialize, Serialize};

/// Pricing model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Continuous dividend yield (annualized).
    #[serde(default)]
    pub dividend_yield: f64,
    /// Volatility used when a contract has no usable implied volatility.
    #[serde(default = "default_volatility")]
    pub default_volatility: f64,
    /// Use implied volatility when available.
    #[serde(default = "default_true")]
    pub use_implied_volatility: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            dividend_yield: 0.0,
            default_volatility: default_volatility(),
            use_implied_volatility: true,
        }
    }
}

impl PricingConfig {
    /// Volatility to price a contract with.
    ///
    /// The contract's implied volatility when enabled and usable, otherwise
    /// the configured default.
    #[must_use]
    pub fn volatility_for(&self, implied: Option<f64>) -> f64 {
        match implied {
            Some(iv) if self.use_implied_volatility && iv.is_finite() && iv > 0.0 => iv,
            _ => self.default_volatility,
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.05
}

const fn default_volatility() -> f64 {
    0.30
}

const fn default_true() -> bool {
    true
}
