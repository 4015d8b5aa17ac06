//! Candidate scoring and ranking

use crate::analysis::{consensus, quality};
use crate::capability::model::CanonicalModel;
use crate::capability::table::CapabilityTable;
use crate::core::candidate::CandidateResponse;
use crate::core::category::QueryCategory;
use crate::core::query::Query;
use crate::ranking::score::{RankedCandidate, Ranking, RankingOutcome, ScoreBreakdown};
use crate::ranking::weights::ScoreWeights;
use std::cmp::Ordering;
use std::sync::Arc;

/// Reason tag on the candidate selected by the factual-override rule
pub const FACTUAL_OVERRIDE_REASON: &str = "factual_override";
/// Reason tag on a candidate whose combined score came out non-finite and
/// was replaced by the neutral fallback
pub const SCORING_ANOMALY_REASON: &str = "scoring_anomaly";
/// Reason tag when most other models restate this candidate
pub const HIGH_CONSENSUS_REASON: &str = "high_consensus";
/// Reason tag when almost no other model restates this candidate
pub const LOW_CONSENSUS_REASON: &str = "low_consensus";

const HIGH_CONSENSUS: f64 = 0.75;
const LOW_CONSENSUS: f64 = 0.25;

/// Scores and orders candidate responses for a query.
///
/// Holds an immutable capability-table snapshot; ranking is pure and
/// deterministic, so for fixed inputs the output order never changes and
/// equal scores keep the caller's candidate order.
#[derive(Debug, Clone)]
pub struct ResponseRanker {
    capabilities: Arc<CapabilityTable>,
    factual_override: CanonicalModel,
}

impl ResponseRanker {
    /// Create a ranker over a capability table. The factual-override model
    /// defaults to gpt-4o.
    pub fn new(capabilities: Arc<CapabilityTable>) -> Self {
        Self {
            capabilities,
            factual_override: CanonicalModel::Gpt4o,
        }
    }

    /// Designate the model that wins factual queries outright
    pub fn with_factual_override(mut self, model: CanonicalModel) -> Self {
        self.factual_override = model;
        self
    }

    /// Rank candidates for a query, best first.
    ///
    /// Failed and blank candidates are excluded up front; when none
    /// survive, the outcome is [`RankingOutcome::NoValidCandidates`]. Every
    /// surviving candidate gets a full score breakdown even when the
    /// factual-override rule decides the winner, so callers can always
    /// explain the ranking.
    pub fn rank(&self, query: &Query, candidates: &[CandidateResponse]) -> RankingOutcome {
        let valid: Vec<(&CandidateResponse, &str)> = candidates
            .iter()
            .filter_map(|c| c.text().map(|t| (c, t)))
            .collect();
        if valid.is_empty() {
            return RankingOutcome::NoValidCandidates;
        }

        let weights = ScoreWeights::for_category(query.category());
        let mut entries: Vec<RankedCandidate> = valid
            .iter()
            .enumerate()
            .map(|(i, (candidate, text))| {
                let agreement = if valid.len() < 2 {
                    consensus::NEUTRAL_AGREEMENT
                } else {
                    let others: Vec<&str> = valid
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, (_, other))| *other)
                        .collect();
                    consensus::agreement(text, &others)
                };
                let capability = self.capabilities.weight(&candidate.model, query.category());
                let cost_efficiency =
                    CanonicalModel::normalize(&candidate.model).cost_efficiency();
                score_candidate(
                    candidate,
                    text,
                    query,
                    agreement,
                    capability,
                    cost_efficiency,
                    &weights,
                )
            })
            .collect();

        // Business rule: on factual queries the designated model, when it
        // answered at all, wins outright.
        if query.category() == QueryCategory::Factual {
            if let Some(entry) = entries
                .iter_mut()
                .find(|e| CanonicalModel::normalize(&e.model) == self.factual_override)
            {
                entry.score = 1.0;
                entry.reasons.push(FACTUAL_OVERRIDE_REASON.to_string());
            }
        }

        // Stable sort: equal scores keep the caller's candidate order
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        if let Some(pos) = entries
            .iter()
            .position(|e| e.has_reason(FACTUAL_OVERRIDE_REASON))
        {
            let entry = entries.remove(pos);
            entries.insert(0, entry);
        }

        RankingOutcome::Ranked(Ranking::new(entries))
    }
}

/// Weighted aggregation of one candidate's component scores.
///
/// Every component except structure is clamped to [0, 1] before weighting;
/// structure enters raw so the template kill switch can drag the sum down.
/// The final score is clamped to [0, 1]. A non-finite sum (defensive; all
/// inputs should be finite) is replaced by a neutral 0.5 so one bad
/// candidate cannot abort the round.
fn score_candidate(
    candidate: &CandidateResponse,
    text: &str,
    query: &Query,
    agreement: f64,
    capability: f64,
    cost_efficiency: f64,
    weights: &ScoreWeights,
) -> RankedCandidate {
    let q = quality::analyze(text, Some(query));
    let breakdown = ScoreBreakdown {
        relevance: q.relevance.clamp(0.0, 1.0),
        coherence: q.coherence.clamp(0.0, 1.0),
        structure: q.structure.clamp(0.0, 1.0),
        confidence: q.confidence.clamp(0.0, 1.0),
        length_fit: q.length_fit.clamp(0.0, 1.0),
        consensus: agreement.clamp(0.0, 1.0),
        capability: capability.clamp(0.0, 1.0),
        cost_efficiency: cost_efficiency.clamp(0.0, 1.0),
    };

    let combined = weights.relevance * breakdown.relevance
        + weights.coherence * breakdown.coherence
        + weights.structure * q.structure.min(1.0)
        + weights.confidence * breakdown.confidence
        + weights.length_fit * breakdown.length_fit
        + weights.consensus * breakdown.consensus
        + weights.capability * breakdown.capability
        + weights.cost_efficiency * breakdown.cost_efficiency;

    let mut reasons: Vec<String> = q.issues.iter().map(|i| i.as_str().to_string()).collect();
    let score = if combined.is_finite() {
        combined.clamp(0.0, 1.0)
    } else {
        reasons.push(SCORING_ANOMALY_REASON.to_string());
        0.5
    };
    if breakdown.consensus >= HIGH_CONSENSUS {
        reasons.push(HIGH_CONSENSUS_REASON.to_string());
    } else if breakdown.consensus <= LOW_CONSENSUS {
        reasons.push(LOW_CONSENSUS_REASON.to_string());
    }

    RankedCandidate {
        model: candidate.model.clone(),
        score,
        reasons,
        breakdown,
    }
}
