//! Response text analysis.
//!
//! Pure, deterministic heuristics over response text:
//!
//! - [`quality`]: the five quality sub-scores and issue flags
//! - [`consensus`]: cross-model agreement scoring
//! - [`textops`]: shared sentence/paragraph/word primitives
//!
//! Keyword tables live in the crate-private `lexicon` module; everything
//! matches lowercased text
//! against fixed lists so the heuristics stay auditable and deterministic.

pub(crate) mod lexicon;

pub mod consensus;
pub mod quality;
pub mod textops;

pub use consensus::{NEUTRAL_AGREEMENT, agreement};
pub use quality::{QualityIssue, QualityScore, analyze};
