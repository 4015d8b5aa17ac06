//! Query value object with derived category and complexity

use crate::analysis::{lexicon, textops};
use crate::core::category::QueryCategory;
use serde::{Deserialize, Serialize};

/// Maximum complexity a query can be assigned
pub const MAX_COMPLEXITY: u8 = 10;

/// A user query posed to the ensemble (Value Object)
///
/// Carries the raw text plus two derived facts that steer the pipeline:
/// the [`QueryCategory`] and a complexity estimate on a 1-10 scale. Both
/// are computed once at construction; callers with better knowledge (a
/// chat layer that already classified the message) can override them with
/// the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    category: QueryCategory,
    complexity: u8,
}

impl Query {
    /// Create a new query from text
    ///
    /// # Panics
    /// Panics if the text is empty or whitespace-only. Use [`Query::try_new`]
    /// for fallible construction.
    pub fn new(text: impl Into<String>) -> Self {
        Self::try_new(text).expect("Query text cannot be empty")
    }

    /// Create a query, returning `None` if the text is empty
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        let category = QueryCategory::classify(&text);
        let complexity = estimate_complexity(&text);
        Some(Self {
            text,
            category,
            complexity,
        })
    }

    /// Override the derived category (e.g. with a chat-layer hint)
    pub fn with_category(mut self, category: QueryCategory) -> Self {
        self.category = category;
        self
    }

    /// Override the derived complexity, clamped to 1-10
    pub fn with_complexity(mut self, complexity: u8) -> Self {
        self.complexity = complexity.clamp(1, MAX_COMPLEXITY);
        self
    }

    /// Get the query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the query category
    pub fn category(&self) -> QueryCategory {
        self.category
    }

    /// Get the complexity estimate (1-10)
    pub fn complexity(&self) -> u8 {
        self.complexity
    }

    /// Whether this query asks for a specific fact.
    ///
    /// True when the category is [`QueryCategory::Factual`] or the text
    /// matches a factual question pattern; the template-phrase kill switch
    /// keys off this.
    pub fn is_factual(&self) -> bool {
        if self.category == QueryCategory::Factual {
            return true;
        }
        let lower = self.text.to_lowercase();
        lexicon::FACTUAL_QUERY_PATTERNS
            .iter()
            .any(|p| lower.contains(p))
    }
}

/// Estimate query complexity on a 1-10 scale.
///
/// Longer queries, technical vocabulary and multiple questions each add
/// points on top of a base of 1; the maximum reachable total is exactly 10
/// (1 + 4 length + 3 technical + 2 questions).
pub fn estimate_complexity(text: &str) -> u8 {
    let lower = text.to_lowercase();
    let length_points = (textops::word_count(text) / 25).min(4);
    let technical_points = lexicon::TECHNICAL_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .count()
        .min(3);
    let question_points = text.matches('?').count().min(2);
    let total = 1 + length_points + technical_points + question_points;
    total.clamp(1, MAX_COMPLEXITY as usize) as u8
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::new(s)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
