//! Application Services
//!
//! Orchestration shared by the use cases.

mod dispatcher;

pub use dispatcher::{ChannelOutcome, DispatchReport, NotificationDispatcher};
