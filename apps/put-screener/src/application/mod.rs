//! Application Layer
//!
//! The application layer orchestrates the screening pipeline.
//! It defines:
//!
//! - **Ports**: Interfaces for market data and notification transports
//! - **Services**: The notification dispatcher
//! - **Use Cases**: Per-symbol analysis and the full cycle

pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::*;
pub use services::*;
pub use use_cases::*;
