//! Ranking result value objects

use serde::{Deserialize, Serialize};

/// Per-component scores kept for transparency, all clamped to [0, 1].
///
/// The raw structure score can be negative (template kill switch); this
/// record holds the clamped view that outside callers see.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub relevance: f64,
    pub coherence: f64,
    pub structure: f64,
    pub confidence: f64,
    pub length_fit: f64,
    pub consensus: f64,
    pub capability: f64,
    pub cost_efficiency: f64,
}

/// One candidate's place in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Raw model name as the caller requested it
    pub model: String,
    /// Combined score in [0, 1]
    pub score: f64,
    /// Why the score landed where it did: quality issue flags plus tags
    /// like `factual_override` or `low_consensus`
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

impl RankedCandidate {
    /// Whether a reason tag was recorded for this candidate
    pub fn has_reason(&self, tag: &str) -> bool {
        self.reasons.iter().any(|r| r == tag)
    }
}

/// Candidates ordered best-first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankedCandidate>,
}

impl Ranking {
    pub(crate) fn new(entries: Vec<RankedCandidate>) -> Self {
        Self { entries }
    }

    /// The winning candidate
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.entries.first()
    }

    /// All candidates, best first
    pub fn entries(&self) -> &[RankedCandidate] {
        &self.entries
    }

    /// Consume the ranking, yielding the ordered candidates
    pub fn into_entries(self) -> Vec<RankedCandidate> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What ranking produced.
///
/// `NoValidCandidates` is an expected outcome (every model failed or
/// returned blank text), not an error: callers turn it into a
/// no-valid-response verdict instead of propagating a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingOutcome {
    Ranked(Ranking),
    NoValidCandidates,
}

impl RankingOutcome {
    /// The ranking, if any candidate survived filtering
    pub fn ranking(&self) -> Option<&Ranking> {
        match self {
            RankingOutcome::Ranked(ranking) => Some(ranking),
            RankingOutcome::NoValidCandidates => None,
        }
    }
}
