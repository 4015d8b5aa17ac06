//! Domain layer for chorus
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on runtime or transport concerns.
//!
//! # Core Concepts
//!
//! ## Ensemble round
//!
//! One query fans out to several models; each reply comes back as a
//! [`CandidateResponse`], successful or not. The round always produces an
//! outcome, even when every model failed.
//!
//! ## Scoring and ranking
//!
//! - **Quality**: per-response heuristics (relevance, coherence, structure,
//!   confidence, length fit)
//! - **Consensus**: how much the other candidates restate a response
//! - **Capability / cost**: per-model weights from the capability table and
//!   the pricing catalog
//!
//! [`ResponseRanker`] combines these under category-dependent weights into
//! an explainable, deterministic ranking.
//!
//! ## Blending
//!
//! Complex queries can get a composite answer assembled from the top-ranked
//! responses; every blend degrades to the best single text when there is
//! nothing worth merging.

pub mod analysis;
pub mod blending;
pub mod capability;
pub mod core;
pub mod outcome;
pub mod ranking;
pub mod util;

// Re-export commonly used types
pub use analysis::{NEUTRAL_AGREEMENT, QualityIssue, QualityScore, agreement, analyze};
pub use blending::{
    BlendDecision, BlendStrategy, BlendedText, MIN_BLEND_CANDIDATES, blend, decide, strategy_for,
};
pub use capability::{
    CanonicalModel, CapabilityTable, DEFAULT_CAPABILITY_WEIGHT, REFERENCE_COST_PER_1K,
};
pub use core::{
    candidate::{CandidateError, CandidateOutcome, CandidateResponse},
    category::QueryCategory,
    error::DomainError,
    query::{MAX_COMPLEXITY, Query, estimate_complexity},
};
pub use outcome::{EnsembleOutcome, EnsembleVerdict, ModelFailure, NoValidResponse};
pub use ranking::{
    COMPLEX_QUERY_WEIGHTS, FACTUAL_OVERRIDE_REASON, RankedCandidate, Ranking, RankingOutcome,
    ResponseRanker, SIMPLE_QUERY_WEIGHTS, ScoreBreakdown, ScoreWeights,
};
pub use util::truncate_str;
