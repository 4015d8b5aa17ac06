//! Text quality scoring.
//!
//! Five independent sub-scores over a response text, plus a set of issue
//! flags. Everything here is pure and deterministic; the weighted
//! aggregation (and the final clamp to [0, 1]) happens in the ranking
//! engine, which is why [`structure`] may legitimately return a negative
//! raw value for templated answers.

use crate::analysis::lexicon;
use crate::analysis::textops;
use crate::core::query::Query;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sub-score used when there is no signal to score against
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Raw structure score for a templated answer to a factual query. Low
/// enough that no other component can rescue the candidate once the
/// weighted sum is clamped.
pub const KILL_SWITCH_STRUCTURE: f64 = -2.0;

/// Structure penalty for a templated answer to a non-factual query
pub const TEMPLATE_PENALTY: f64 = 0.6;

/// Responses shorter than this many words are penalized as too short
pub const MIN_WORDS: usize = 50;

/// Upper bound of the comfortable length band
pub const MAX_COMFORT_WORDS: usize = 1000;

/// Words past the comfort band over which length fit decays to zero
const LENGTH_DECAY_SPAN: f64 = 2000.0;

/// Length-fit penalty for a response that ends mid-thought
const TRUNCATION_PENALTY: f64 = 0.2;

/// Responses longer than this many words get the excessive-length flag
pub const EXCESSIVE_WORDS: usize = 2000;

/// Confidence register when no confidence or uncertainty words appear
const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Share of the confidence score carried by keyword register (the rest
/// comes from response volume)
const CONFIDENCE_KEYWORD_SHARE: f64 = 0.7;

/// Word count at which response volume stops adding confidence
const CONFIDENCE_VOLUME_WORDS: f64 = 100.0;

/// Problems detected in a response text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    TemplatePhrase,
    Truncated,
    ExcessiveRepetition,
    SelfReference,
    TooShort,
    ExcessiveLength,
}

impl QualityIssue {
    /// Get the string identifier for this issue (also the reason tag)
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityIssue::TemplatePhrase => "template_phrase",
            QualityIssue::Truncated => "truncated",
            QualityIssue::ExcessiveRepetition => "excessive_repetition",
            QualityIssue::SelfReference => "self_reference",
            QualityIssue::TooShort => "too_short",
            QualityIssue::ExcessiveLength => "excessive_length",
        }
    }
}

impl std::fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quality analysis of one response (Value Object)
///
/// All sub-scores except `structure` stay within [0, 1]; `structure` is the
/// raw value and may be negative when a template phrase was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub relevance: f64,
    pub coherence: f64,
    pub structure: f64,
    pub confidence: f64,
    pub length_fit: f64,
    pub issues: BTreeSet<QualityIssue>,
}

impl QualityScore {
    /// Whether a specific issue was flagged
    pub fn has_issue(&self, issue: QualityIssue) -> bool {
        self.issues.contains(&issue)
    }
}

/// Analyze a response against an optional query
pub fn analyze(response: &str, query: Option<&Query>) -> QualityScore {
    let factual = query.is_some_and(Query::is_factual);
    let word_count = textops::word_count(response);

    let mut issues = BTreeSet::new();
    if matched_template_phrase(response).is_some() {
        issues.insert(QualityIssue::TemplatePhrase);
    }
    if is_truncated(response) {
        issues.insert(QualityIssue::Truncated);
    }
    if has_repeated_paragraphs(response) {
        issues.insert(QualityIssue::ExcessiveRepetition);
    }
    if has_self_reference(response) {
        issues.insert(QualityIssue::SelfReference);
    }
    if word_count < MIN_WORDS {
        issues.insert(QualityIssue::TooShort);
    }
    if word_count > EXCESSIVE_WORDS {
        issues.insert(QualityIssue::ExcessiveLength);
    }

    QualityScore {
        relevance: relevance(response, query.map(Query::text)),
        coherence: coherence(response),
        structure: structure(response, factual),
        confidence: confidence(response),
        length_fit: length_fit(response),
        issues,
    }
}

/// How much of the query's vocabulary the response covers.
///
/// Terms are the query's unique significant words; the score is the
/// fraction of them appearing (case-insensitive) in the response. Without
/// a query, or with a query of nothing but stopwords, there is no signal
/// and the score is neutral.
pub fn relevance(response: &str, query: Option<&str>) -> f64 {
    let Some(query) = query else {
        return NEUTRAL_SCORE;
    };
    let terms: BTreeSet<String> = textops::significant_words(query).into_iter().collect();
    if terms.is_empty() {
        return NEUTRAL_SCORE;
    }
    let response_lower = response.to_lowercase();
    let hits = terms
        .iter()
        .filter(|t| response_lower.contains(t.as_str()))
        .count();
    hits as f64 / terms.len() as f64
}

/// Discourse quality: transitions raise it, self-reference and repeated
/// paragraphs lower it. Range is 0.1 to 0.75 before aggregation clamping.
pub fn coherence(response: &str) -> f64 {
    let lower = response.to_lowercase();
    let mut score = 0.5;
    if lexicon::TRANSITION_WORDS.iter().any(|w| lower.contains(w)) {
        score += 0.25;
    }
    if has_self_reference(response) {
        score -= 0.2;
    }
    if has_repeated_paragraphs(response) {
        score -= 0.2;
    }
    score
}

/// Whether the response talks about being an AI
pub fn has_self_reference(response: &str) -> bool {
    let lower = response.to_lowercase();
    lexicon::SELF_REFERENCE_PHRASES
        .iter()
        .any(|p| lower.contains(p))
}

/// Whether any two paragraphs are near-duplicates of each other
pub fn has_repeated_paragraphs(response: &str) -> bool {
    let paragraphs = textops::split_paragraphs(response);
    for (i, a) in paragraphs.iter().enumerate() {
        for b in &paragraphs[i + 1..] {
            if textops::jaccard_similarity(a, b) > textops::PARAGRAPH_SIMILARITY_THRESHOLD {
                return true;
            }
        }
    }
    false
}

/// The first template phrase found in the response, if any
pub fn matched_template_phrase(response: &str) -> Option<&'static str> {
    let lower = response.to_lowercase();
    lexicon::TEMPLATE_PHRASES
        .iter()
        .find(|p| lower.contains(*p))
        .copied()
}

/// Formatting quality, with the template kill switch.
///
/// Base 0.5, plus 0.1 each for a 3-10 paragraph layout, list markers and a
/// fenced code block. A template phrase on a factual query replaces the
/// score with [`KILL_SWITCH_STRUCTURE`]; on any other query it subtracts
/// [`TEMPLATE_PENALTY`]. The returned value is raw and only clamped during
/// aggregation.
pub fn structure(response: &str, factual_query: bool) -> f64 {
    let mut score: f64 = 0.5;
    let paragraphs = textops::split_paragraphs(response);
    if (3..=10).contains(&paragraphs.len()) {
        score += 0.1;
    }
    if textops::has_list_markers(response) {
        score += 0.1;
    }
    if response.contains("```") {
        score += 0.1;
    }
    let score = score.min(1.0);

    match matched_template_phrase(response) {
        Some(_) if factual_query => KILL_SWITCH_STRUCTURE,
        Some(_) => score - TEMPLATE_PENALTY,
        None => score,
    }
}

/// Fit of the response length into the 50-1000 word comfort band.
///
/// Short responses scale linearly up to 1.0 at 50 words; long ones decay
/// linearly past 1000 words, hitting zero at 3000. A truncation-marker
/// ending costs another 0.2.
pub fn length_fit(response: &str) -> f64 {
    let words = textops::word_count(response);
    let mut score = if words < MIN_WORDS {
        words as f64 / MIN_WORDS as f64
    } else if words <= MAX_COMFORT_WORDS {
        1.0
    } else {
        (1.0 - (words - MAX_COMFORT_WORDS) as f64 / LENGTH_DECAY_SPAN).max(0.0)
    };
    if is_truncated(response) {
        score = (score - TRUNCATION_PENALTY).max(0.0);
    }
    score
}

/// Whether the response ends mid-thought
pub fn is_truncated(response: &str) -> bool {
    textops::ends_with_truncation_marker(response)
}

/// Register of certainty in the response.
///
/// Keyword register (confident vs uncertain word occurrences, 0.7 when
/// neither appears) blended 70/30 with response volume, where volume
/// saturates at 100 words.
pub fn confidence(response: &str) -> f64 {
    let lower = response.to_lowercase();
    let confident: usize = lexicon::CONFIDENCE_WORDS
        .iter()
        .map(|w| lower.matches(w).count())
        .sum();
    let uncertain: usize = lexicon::UNCERTAINTY_WORDS
        .iter()
        .map(|w| lower.matches(w).count())
        .sum();
    let register = if confident + uncertain == 0 {
        DEFAULT_CONFIDENCE
    } else {
        confident as f64 / (confident + uncertain) as f64
    };
    let volume = (textops::word_count(response) as f64 / CONFIDENCE_VOLUME_WORDS).min(1.0);
    CONFIDENCE_KEYWORD_SHARE * register + (1.0 - CONFIDENCE_KEYWORD_SHARE) * volume
}
