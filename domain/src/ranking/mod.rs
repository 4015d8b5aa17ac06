//! Weighted scoring and ordering of candidate responses.
//!
//! [`ResponseRanker`] combines the per-candidate quality sub-scores with
//! cross-candidate consensus, the capability table and cost efficiency
//! under a category-dependent weight profile, then orders candidates best
//! first. The outcome is explainable: every entry carries its component
//! breakdown and reason tags.

pub mod ranker;
pub mod score;
pub mod weights;

pub use ranker::{
    FACTUAL_OVERRIDE_REASON, HIGH_CONSENSUS_REASON, LOW_CONSENSUS_REASON, ResponseRanker,
    SCORING_ANOMALY_REASON,
};
pub use score::{RankedCandidate, Ranking, RankingOutcome, ScoreBreakdown};
pub use weights::{COMPLEX_QUERY_WEIGHTS, SIMPLE_QUERY_WEIGHTS, ScoreWeights};
