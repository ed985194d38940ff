//! Market Data Port (Driven Port)
//!
//! Interface for fetching quotes and put chains from an external provider.
//! Every error is a recoverable per-symbol failure.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::OptionContract;

/// Market data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Data unavailable.
    #[error("Market data unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// API error.
    #[error("Market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },
}

/// Port for fetching market data from external providers.
///
/// This is a driven (secondary/outbound) port. The infrastructure layer
/// provides implementations (Yahoo Finance, in-memory).
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Last traded price of the underlying.
    async fn current_price(&self, symbol: &str) -> Result<Decimal, MarketDataError>;

    /// Listed option expirations, in any order.
    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, MarketDataError>;

    /// Put contracts for one expiration.
    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<Vec<OptionContract>, MarketDataError>;
}
