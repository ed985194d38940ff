//! Yahoo Finance v7 options API response types.

use serde::Deserialize;

/// Top-level response of `/v7/finance/options/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    /// Envelope.
    pub option_chain: OptionChainEnvelope,
}

/// Result list plus provider error.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionChainEnvelope {
    /// Results, one per requested symbol.
    #[serde(default)]
    pub result: Vec<OptionChainResult>,
    /// Provider error, if any.
    #[serde(default)]
    pub error: Option<YahooError>,
}

/// Provider error body.
#[derive(Debug, Clone, Deserialize)]
pub struct YahooError {
    /// Error code ("Not Found", ...).
    #[serde(default)]
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Chain data for one symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainResult {
    /// Underlying symbol.
    #[serde(default)]
    pub underlying_symbol: String,
    /// Listed expirations as Unix timestamps (midnight UTC).
    #[serde(default)]
    pub expiration_dates: Vec<i64>,
    /// Underlying quote.
    #[serde(default)]
    pub quote: Option<UnderlyingQuote>,
    /// Option tables, one per requested expiration.
    #[serde(default)]
    pub options: Vec<OptionTable>,
}

/// Underlying quote fields used by the screener.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderlyingQuote {
    /// Last regular-session price.
    #[serde(default)]
    pub regular_market_price: Option<f64>,
}

/// Calls and puts of one expiration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionTable {
    /// Expiration as a Unix timestamp.
    #[serde(default)]
    pub expiration_date: Option<i64>,
    /// Put contracts.
    #[serde(default)]
    pub puts: Vec<YahooContract>,
}

/// A single listed contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooContract {
    /// OCC contract symbol.
    #[serde(default)]
    pub contract_symbol: String,
    /// Strike price.
    pub strike: f64,
    /// Best bid.
    #[serde(default)]
    pub bid: Option<f64>,
    /// Best ask.
    #[serde(default)]
    pub ask: Option<f64>,
    /// Last traded price.
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Implied volatility as a fraction.
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    /// Expiration as a Unix timestamp.
    #[serde(default)]
    pub expiration: Option<i64>,
}
