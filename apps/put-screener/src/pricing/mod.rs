//! Option pricing and assignment risk.

pub mod black_scholes;
mod risk_model;

pub use black_scholes::{PricingError, PutGreeks, PutInputs, put_delta, put_greeks};
pub use risk_model::{
    DAYS_PER_YEAR, RiskAssessment, RiskModel, assignment_probability, fallback_probability,
};
