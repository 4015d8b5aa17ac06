//! Cross-model agreement scoring.
//!
//! Consensus is a lexical proxy: a candidate's claims matter more when the
//! other models said roughly the same thing. No semantic model, just the
//! shared statement-overlap matcher from [`textops`](crate::analysis::textops).

use crate::analysis::textops;

/// Agreement assigned when there is nothing to compare against
pub const NEUTRAL_AGREEMENT: f64 = 0.5;

/// Sentences need at least this many words to count as a claim
const MIN_SENTENCE_WORDS: usize = 3;

/// How much the other responses agree with this candidate, in [0, 1].
///
/// For each claim-sized sentence (3+ words) of the candidate, the fraction
/// of other responses restating it; overall agreement is the mean across
/// those sentences. A candidate with no claim-sized sentences, or nothing
/// to compare against, scores neutral.
pub fn agreement(candidate: &str, others: &[&str]) -> f64 {
    if others.is_empty() {
        return NEUTRAL_AGREEMENT;
    }
    let sentences: Vec<&str> = textops::split_sentences(candidate)
        .into_iter()
        .filter(|s| textops::word_count(s) >= MIN_SENTENCE_WORDS)
        .collect();
    if sentences.is_empty() {
        return NEUTRAL_AGREEMENT;
    }
    let total: f64 = sentences
        .iter()
        .map(|sentence| {
            let matching = others
                .iter()
                .filter(|other| textops::is_supported_by(sentence, other))
                .count();
            matching as f64 / others.len() as f64
        })
        .sum();
    total / sentences.len() as f64
}
