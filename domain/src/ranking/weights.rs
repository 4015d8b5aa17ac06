//! Combined-score weight regimes

use crate::core::category::QueryCategory;
use serde::{Deserialize, Serialize};

/// Weights of the combined-score components. Each regime sums to 1.0, so a
/// candidate scoring 1.0 on every component scores a combined 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub relevance: f64,
    pub coherence: f64,
    pub consensus: f64,
    pub structure: f64,
    pub confidence: f64,
    pub length_fit: f64,
    pub capability: f64,
    pub cost_efficiency: f64,
}

/// Regime for categories where capability separates models: capability
/// carries 20%, cost efficiency 10%
pub const COMPLEX_QUERY_WEIGHTS: ScoreWeights = ScoreWeights {
    relevance: 0.15,
    coherence: 0.15,
    consensus: 0.15,
    structure: 0.15,
    confidence: 0.05,
    length_fit: 0.05,
    capability: 0.20,
    cost_efficiency: 0.10,
};

/// Regime for simple lookups (factual/general): cost matters more, so the
/// 0.15 share moves from capability to cost efficiency. Nothing else shifts.
pub const SIMPLE_QUERY_WEIGHTS: ScoreWeights = ScoreWeights {
    relevance: 0.15,
    coherence: 0.15,
    consensus: 0.15,
    structure: 0.15,
    confidence: 0.05,
    length_fit: 0.05,
    capability: 0.05,
    cost_efficiency: 0.25,
};

impl ScoreWeights {
    /// Pick the weight regime for a query category
    pub fn for_category(category: QueryCategory) -> ScoreWeights {
        match category {
            QueryCategory::Factual | QueryCategory::General => SIMPLE_QUERY_WEIGHTS,
            _ => COMPLEX_QUERY_WEIGHTS,
        }
    }

    /// Sum of all component weights
    pub fn total(&self) -> f64 {
        self.relevance
            + self.coherence
            + self.consensus
            + self.structure
            + self.confidence
            + self.length_fit
            + self.capability
            + self.cost_efficiency
    }
}
