//! Final results of an ensemble round.
//!
//! A round that produced at least one usable candidate ends in an
//! [`EnsembleVerdict`]; a round where every model failed ends in
//! [`NoValidResponse`]. Both are ordinary outcomes, not errors: the
//! caller always learns what was attempted and why.

use crate::blending::BlendStrategy;
use crate::core::candidate::{CandidateError, CandidateResponse};
use crate::ranking::score::RankedCandidate;
use serde::{Deserialize, Serialize};

/// The selected or blended answer for one ensemble round.
///
/// `blend_strategy` records what the blend gate decided; `blended` records
/// whether the final text actually came out a composite. A blend that
/// degraded to the top-ranked text leaves `blended` false.
///
/// # Examples
///
/// ```
/// use chorus_domain::EnsembleVerdict;
///
/// let verdict = EnsembleVerdict::new(
///     "Paris is the capital of France.",
///     vec!["gpt-4o".to_string()],
///     false,
///     None,
///     Vec::new(),
/// );
/// assert!(!verdict.blended);
/// assert!(verdict.timestamp > 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleVerdict {
    /// The answer served to the caller
    pub final_text: String,
    /// Models whose text the answer draws from, best first
    pub chosen_models: Vec<String>,
    /// Whether `final_text` is a composite of several responses
    pub blended: bool,
    /// Strategy the blend gate picked, if it picked one
    pub blend_strategy: Option<BlendStrategy>,
    /// Full scored ranking, best first
    pub ranking: Vec<RankedCandidate>,
    /// When the verdict was assembled (milliseconds since epoch)
    pub timestamp: u64,
}

impl EnsembleVerdict {
    pub fn new(
        final_text: impl Into<String>,
        chosen_models: Vec<String>,
        blended: bool,
        blend_strategy: Option<BlendStrategy>,
        ranking: Vec<RankedCandidate>,
    ) -> Self {
        Self {
            final_text: final_text.into(),
            chosen_models,
            blended,
            blend_strategy,
            ranking,
            timestamp: current_timestamp(),
        }
    }

    /// The top-ranked candidate, when any candidate was usable
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.ranking.first()
    }

    /// The verdict as a JSON value, for structured logging
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// One model's failure, kept for the round report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFailure {
    pub model: String,
    pub error: CandidateError,
}

/// Every model failed or returned blank text.
///
/// Carries which models were attempted and what each one did wrong, so
/// the caller can report the round instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoValidResponse {
    /// Every model the round fanned out to, in request order
    pub attempted: Vec<String>,
    /// The failures, in request order
    pub failures: Vec<ModelFailure>,
}

impl NoValidResponse {
    pub fn from_candidates(candidates: &[CandidateResponse]) -> Self {
        let attempted = candidates.iter().map(|c| c.model.clone()).collect();
        let failures = candidates
            .iter()
            .filter(|c| !c.is_valid())
            .map(|c| ModelFailure {
                model: c.model.clone(),
                // an answered-but-blank candidate has no stored error
                error: c.error().cloned().unwrap_or(CandidateError::EmptyResponse),
            })
            .collect();
        Self {
            attempted,
            failures,
        }
    }
}

/// How an ensemble round ended
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleOutcome {
    /// A usable answer was selected or blended
    Answer(EnsembleVerdict),
    /// No model produced usable text
    NoValidResponse(NoValidResponse),
}

impl EnsembleOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, EnsembleOutcome::Answer(_))
    }

    pub fn verdict(&self) -> Option<&EnsembleVerdict> {
        match self {
            EnsembleOutcome::Answer(verdict) => Some(verdict),
            EnsembleOutcome::NoValidResponse(_) => None,
        }
    }
}

/// Current time in milliseconds since epoch
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
