//! Use Cases
//!
//! Application-specific orchestration of the screening pipeline.

mod analyze_symbol;
mod run_cycle;

pub use analyze_symbol::{AnalysisError, AnalyzeSymbolUseCase};
pub use run_cycle::{CycleSummary, RunCycleUseCase, SymbolFailure};
