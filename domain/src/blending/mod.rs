//! Deciding between a single best answer and a composite one.
//!
//! [`decide`] gates blending on the query: comparison queries always
//! blend once two usable candidates exist, everything else has to clear a
//! complexity bar first. [`blend`] then assembles the composite; it
//! degrades to the top-ranked text whenever a strategy finds nothing
//! worth adding, so callers never have to special-case a failed blend.

use crate::core::category::QueryCategory;
use crate::core::query::Query;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod strategies;

pub use strategies::{BlendedText, blend};

/// Blending needs at least this many usable candidate texts
pub const MIN_BLEND_CANDIDATES: usize = 2;
/// Reasoning queries blend from this complexity up
pub const REASONING_BLEND_COMPLEXITY: u8 = 7;
/// Technical queries blend from this complexity up
pub const TECHNICAL_BLEND_COMPLEXITY: u8 = 8;
/// Every other category blends only near the top of the scale
pub const DEFAULT_BLEND_COMPLEXITY: u8 = 9;

/// How a composite answer gets assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendStrategy {
    Comparison,
    Technical,
    Explanation,
    General,
}

impl BlendStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendStrategy::Comparison => "comparison",
            BlendStrategy::Technical => "technical",
            BlendStrategy::Explanation => "explanation",
            BlendStrategy::General => "general",
        }
    }
}

impl fmt::Display for BlendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of the blend gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendDecision {
    /// Serve the top-ranked text as-is
    Single,
    /// Assemble a composite with the given strategy
    Blend(BlendStrategy),
}

impl BlendDecision {
    pub fn is_blend(&self) -> bool {
        matches!(self, BlendDecision::Blend(_))
    }

    pub fn strategy(&self) -> Option<BlendStrategy> {
        match self {
            BlendDecision::Single => None,
            BlendDecision::Blend(strategy) => Some(*strategy),
        }
    }
}

/// The strategy a category blends with when the gate passes
pub fn strategy_for(category: QueryCategory) -> BlendStrategy {
    match category {
        QueryCategory::Comparison => BlendStrategy::Comparison,
        QueryCategory::Technical => BlendStrategy::Technical,
        QueryCategory::Explanation => BlendStrategy::Explanation,
        _ => BlendStrategy::General,
    }
}

/// Decide whether this query's answers are worth blending.
///
/// `valid_count` is the number of candidates with usable text. Comparison
/// queries blend whenever two exist; other categories only once the query
/// is complex enough that a single model's answer tends to be partial.
pub fn decide(query: &Query, valid_count: usize) -> BlendDecision {
    if valid_count < MIN_BLEND_CANDIDATES {
        return BlendDecision::Single;
    }
    let category = query.category();
    let passes = match category {
        QueryCategory::Comparison => true,
        QueryCategory::Reasoning => query.complexity() >= REASONING_BLEND_COMPLEXITY,
        QueryCategory::Technical => query.complexity() >= TECHNICAL_BLEND_COMPLEXITY,
        _ => query.complexity() >= DEFAULT_BLEND_COMPLEXITY,
    };
    if passes {
        BlendDecision::Blend(strategy_for(category))
    } else {
        BlendDecision::Single
    }
}
