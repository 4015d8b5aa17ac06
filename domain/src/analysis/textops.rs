//! Shared pure text operations.
//!
//! Everything downstream (quality scoring, consensus, blending) works on
//! the same notion of sentences, paragraphs and significant words, so the
//! primitives live here rather than being re-derived per component.

use crate::analysis::lexicon;
use std::collections::HashSet;

/// A sentence's significant words must overlap another text by more than
/// this fraction to count as "the same statement"
pub const STATEMENT_MATCH_THRESHOLD: f64 = 0.7;

/// Two paragraphs with token-Jaccard similarity above this are treated as
/// repeats of each other
pub const PARAGRAPH_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Words must be longer than this many characters to count as significant
const SIGNIFICANT_WORD_LEN: usize = 3;

/// Split text into sentences, keeping the terminating punctuation.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text, so ellipses and decimal points inside a sentence survive.
/// Text without any terminator comes back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Split text into paragraphs on blank lines
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased words with punctuation stripped from both ends
pub fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Normalized words longer than 3 characters, minus stopwords
pub fn significant_words(text: &str) -> Vec<String> {
    normalized_words(text)
        .into_iter()
        .filter(|w| w.chars().count() > SIGNIFICANT_WORD_LEN)
        .filter(|w| !lexicon::STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Token-set Jaccard similarity of two texts.
///
/// Two empty texts are identical (1.0); one empty text shares nothing (0.0).
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = normalized_words(a).into_iter().collect();
    let set_b: HashSet<String> = normalized_words(b).into_iter().collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    intersection as f64 / union as f64
}

/// Fraction of a sentence's significant words contained (case-insensitive,
/// substring-style) in another text.
///
/// Falls back to all of the sentence's words when fewer than 2 qualify as
/// significant, so short sentences still participate.
pub fn statement_overlap(sentence: &str, other: &str) -> f64 {
    let mut terms = significant_words(sentence);
    if terms.len() < 2 {
        terms = normalized_words(sentence);
    }
    if terms.is_empty() {
        return 0.0;
    }
    let other_lower = other.to_lowercase();
    let hits = terms
        .iter()
        .filter(|t| other_lower.contains(t.as_str()))
        .count();
    hits as f64 / terms.len() as f64
}

/// Whether another text restates this sentence
pub fn is_supported_by(sentence: &str, other: &str) -> bool {
    statement_overlap(sentence, other) > STATEMENT_MATCH_THRESHOLD
}

/// Whether any line of the text starts with a bullet or numbered-list marker
pub fn has_list_markers(text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim_start();
        line.starts_with("- ")
            || line.starts_with("* ")
            || line.starts_with("\u{2022} ")
            || line
                .split_once(". ")
                .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    })
}

/// The first fenced code block, fences included
pub fn first_code_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let body = &text[start + 3..];
    let end = body.find("```")?;
    Some(&text[start..start + 3 + end + 3])
}

/// Whether the text ends in a truncation marker
pub fn ends_with_truncation_marker(text: &str) -> bool {
    let trimmed = text.trim_end();
    let lower = trimmed.to_lowercase();
    lexicon::TRUNCATION_MARKERS
        .iter()
        .any(|m| lower.ends_with(m))
}
