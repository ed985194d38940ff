//! Strike selection and candidate ranking.

pub mod picks;
mod ranker;
mod strikes;

pub use picks::{absolute_best, best_pick, weekly_summary};
pub use ranker::{CandidateRanker, RankingView, sort_for_view};
pub use strikes::{LadderSegment, StrikeSelection, closest_contract};
