//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the screener uses:
//! a market data provider and outbound notification transports.

mod market_data_port;
mod notifier_port;

pub use market_data_port::{MarketDataError, MarketDataPort};
#[cfg(test)]
pub use notifier_port::MockMailer;
pub use notifier_port::{Mailer, Notification, NotificationChannel, NotifyError};
