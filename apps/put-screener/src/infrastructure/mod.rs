//! Infrastructure Layer
//!
//! Adapters for the application ports: Yahoo Finance and in-memory market
//! data, and the HTTP and SMTP notification channels.

pub mod marketdata;
pub mod notify;
