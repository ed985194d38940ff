//! Market data adapters.

pub mod api_types;
mod retry;
mod static_feed;
mod yahoo;

pub use static_feed::StaticMarketData;
pub use yahoo::YahooMarketDataAdapter;
