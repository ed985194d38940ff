//! Report rendering.
//!
//! [`ReportFormatter`] turns a [`StockReport`](crate::domain::StockReport)
//! into the full, compact or SMS text, and [`bounded`] caps any rendering to
//! a byte budget for channels with message limits.

pub mod bounded;
pub mod values;
mod formatter;

pub use bounded::{MORE_MARKER, bounded, split_message};
pub use formatter::{ReportFormatter, ReportOptions, format};
