//! Capability lookup table

use crate::capability::model::CanonicalModel;
use crate::core::category::QueryCategory;
use crate::core::error::DomainError;
use std::collections::HashMap;

/// Weight assumed for (model, category) pairs with no table entry
pub const DEFAULT_CAPABILITY_WEIGHT: f64 = 0.65;

/// Smoothing factor for the offline EMA weight update
pub const EMA_ALPHA: f64 = 0.2;

/// Floor an updated weight can decay to; keeps a cold streak from
/// permanently banishing a model
pub const MIN_UPDATED_WEIGHT: f64 = 0.3;

/// How good each model is at each kind of query.
///
/// Weights live in [0, 1]. Lookup never fails: a missing (model, category)
/// entry falls back to the model's `General` entry, then to
/// [`DEFAULT_CAPABILITY_WEIGHT`], so unknown models still rank (P-style
/// totality mirrors [`CanonicalModel::normalize`]).
///
/// The table is immutable on the request path; rankers hold it behind an
/// `Arc` and read freely. The offline [`CapabilityTable::update`] path
/// takes `&mut self`, so concurrent tuners must serialize behind their own
/// write lock.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    weights: HashMap<(CanonicalModel, QueryCategory), f64>,
}

impl CapabilityTable {
    /// Create an empty table (every lookup hits the default weight)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-populated with the static capability matrix
    /// for every catalog model
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for model in CanonicalModel::known_models() {
            for category in QueryCategory::ALL {
                let weight = default_weight(&model, category);
                table.weights.insert((model.clone(), category), weight);
            }
        }
        table
    }

    /// Capability weight for a raw model name and category.
    ///
    /// Precedence: exact (model, category) entry, then the model's
    /// `General` entry, then [`DEFAULT_CAPABILITY_WEIGHT`].
    pub fn weight(&self, raw_model: &str, category: QueryCategory) -> f64 {
        let model = CanonicalModel::normalize(raw_model);
        if let Some(w) = self.weights.get(&(model.clone(), category)) {
            return *w;
        }
        if let Some(w) = self.weights.get(&(model, QueryCategory::General)) {
            return *w;
        }
        DEFAULT_CAPABILITY_WEIGHT
    }

    /// Set one (model, category) weight, rejecting values outside [0, 1]
    pub fn set(
        &mut self,
        model: CanonicalModel,
        category: QueryCategory,
        weight: f64,
    ) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&weight) || !weight.is_finite() {
            return Err(DomainError::InvalidWeight(weight));
        }
        self.weights.insert((model, category), weight);
        Ok(())
    }

    /// Nudge a weight toward an observed performance score (offline use).
    ///
    /// Exponential moving average with [`EMA_ALPHA`], clamped to
    /// [[`MIN_UPDATED_WEIGHT`], 1.0] so one run can neither bury nor
    /// canonize a model. Not called during ranking.
    pub fn update(&mut self, raw_model: &str, category: QueryCategory, performance: f64) {
        let model = CanonicalModel::normalize(raw_model);
        let old = self.weight(raw_model, category);
        let performance = performance.clamp(0.0, 1.0);
        let updated = EMA_ALPHA * performance + (1.0 - EMA_ALPHA) * old;
        self.weights.insert(
            (model, category),
            updated.clamp(MIN_UPDATED_WEIGHT, 1.0),
        );
    }

    /// Number of (model, category) entries
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// The static capability matrix: how strong each catalog model is assumed
/// to be per category, before any observed-performance tuning.
fn default_weight(model: &CanonicalModel, category: QueryCategory) -> f64 {
    use CanonicalModel::*;
    use QueryCategory::*;
    match (model, category) {
        (Gpt4o, Factual) => 0.95,
        (Gpt4o, Technical) => 0.90,
        (Gpt4o, Creative) => 0.85,
        (Gpt4o, Comparison) => 0.90,
        (Gpt4o, Explanation) => 0.90,
        (Gpt4o, Reasoning) => 0.92,
        (Gpt4o, General) => 0.90,

        (Gpt4Turbo, Factual) => 0.90,
        (Gpt4Turbo, Technical) => 0.88,
        (Gpt4Turbo, Creative) => 0.82,
        (Gpt4Turbo, Comparison) => 0.86,
        (Gpt4Turbo, Explanation) => 0.87,
        (Gpt4Turbo, Reasoning) => 0.89,
        (Gpt4Turbo, General) => 0.86,

        (Gpt4, Factual) => 0.88,
        (Gpt4, Technical) => 0.85,
        (Gpt4, Creative) => 0.80,
        (Gpt4, Comparison) => 0.84,
        (Gpt4, Explanation) => 0.86,
        (Gpt4, Reasoning) => 0.88,
        (Gpt4, General) => 0.84,

        (Gpt35Turbo, Factual) => 0.75,
        (Gpt35Turbo, Technical) => 0.70,
        (Gpt35Turbo, Creative) => 0.72,
        (Gpt35Turbo, Comparison) => 0.70,
        (Gpt35Turbo, Explanation) => 0.74,
        (Gpt35Turbo, Reasoning) => 0.68,
        (Gpt35Turbo, General) => 0.78,

        (Claude3Opus, Factual) => 0.90,
        (Claude3Opus, Technical) => 0.88,
        (Claude3Opus, Creative) => 0.95,
        (Claude3Opus, Comparison) => 0.89,
        (Claude3Opus, Explanation) => 0.92,
        (Claude3Opus, Reasoning) => 0.93,
        (Claude3Opus, General) => 0.88,

        (Claude3Sonnet, Factual) => 0.84,
        (Claude3Sonnet, Technical) => 0.82,
        (Claude3Sonnet, Creative) => 0.88,
        (Claude3Sonnet, Comparison) => 0.82,
        (Claude3Sonnet, Explanation) => 0.86,
        (Claude3Sonnet, Reasoning) => 0.85,
        (Claude3Sonnet, General) => 0.84,

        (Claude3Haiku, Factual) => 0.72,
        (Claude3Haiku, Technical) => 0.68,
        (Claude3Haiku, Creative) => 0.74,
        (Claude3Haiku, Comparison) => 0.68,
        (Claude3Haiku, Explanation) => 0.73,
        (Claude3Haiku, Reasoning) => 0.66,
        (Claude3Haiku, General) => 0.76,

        (MistralLarge, Factual) => 0.80,
        (MistralLarge, Technical) => 0.78,
        (MistralLarge, Creative) => 0.75,
        (MistralLarge, Comparison) => 0.78,
        (MistralLarge, Explanation) => 0.79,
        (MistralLarge, Reasoning) => 0.80,
        (MistralLarge, General) => 0.78,

        (MistralMedium, Factual) => 0.72,
        (MistralMedium, Technical) => 0.70,
        (MistralMedium, Creative) => 0.68,
        (MistralMedium, Comparison) => 0.70,
        (MistralMedium, Explanation) => 0.72,
        (MistralMedium, Reasoning) => 0.70,
        (MistralMedium, General) => 0.72,

        (MistralSmall, Factual) => 0.62,
        (MistralSmall, Technical) => 0.58,
        (MistralSmall, Creative) => 0.60,
        (MistralSmall, Comparison) => 0.58,
        (MistralSmall, Explanation) => 0.62,
        (MistralSmall, Reasoning) => 0.55,
        (MistralSmall, General) => 0.66,

        (LocalSim, Factual) => 0.40,
        (LocalSim, Technical) => 0.35,
        (LocalSim, Creative) => 0.45,
        (LocalSim, Comparison) => 0.38,
        (LocalSim, Explanation) => 0.42,
        (LocalSim, Reasoning) => 0.35,
        (LocalSim, General) => 0.48,

        // Unknown never appears in the matrix; lookups fall through to
        // DEFAULT_CAPABILITY_WEIGHT
        (Unknown(_), _) => DEFAULT_CAPABILITY_WEIGHT,
    }
}
