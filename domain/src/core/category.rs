//! Query category value object and keyword-based classification

use crate::analysis::lexicon;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Broad intent category of a user query (Value Object)
///
/// The category steers capability lookup, the cost-weight regime and the
/// blend strategy, so it is decided once when a
/// [`Query`](crate::core::query::Query) is built and threaded through the
/// pipeline as a typed value rather than re-parsed from strings.
///
/// # Examples
///
/// ```
/// use chorus_domain::QueryCategory;
///
/// let category = QueryCategory::classify("Compare solar and wind energy");
/// assert_eq!(category, QueryCategory::Comparison);
///
/// let category: QueryCategory = "research".parse().unwrap();
/// assert_eq!(category, QueryCategory::Reasoning);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    Factual,
    Technical,
    Creative,
    Comparison,
    Explanation,
    Reasoning,
    General,
}

impl QueryCategory {
    /// Every category, in a fixed order (used for table construction and tests)
    pub const ALL: [QueryCategory; 7] = [
        QueryCategory::Factual,
        QueryCategory::Technical,
        QueryCategory::Creative,
        QueryCategory::Comparison,
        QueryCategory::Explanation,
        QueryCategory::Reasoning,
        QueryCategory::General,
    ];

    /// Get the string identifier for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Factual => "factual",
            QueryCategory::Technical => "technical",
            QueryCategory::Creative => "creative",
            QueryCategory::Comparison => "comparison",
            QueryCategory::Explanation => "explanation",
            QueryCategory::Reasoning => "reasoning",
            QueryCategory::General => "general",
        }
    }

    /// Derive a category from free-form query text.
    ///
    /// First matching bucket wins; comparison and explanation markers are
    /// checked before the factual/technical keyword buckets so that
    /// "what is the difference between ..." lands in `Comparison` and
    /// "explain recursion" lands in `Explanation`, not `Technical`.
    /// Text matching no bucket falls back to `General`.
    pub fn classify(text: &str) -> QueryCategory {
        let lower = text.to_lowercase();
        let contains_any = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

        if contains_any(&lexicon::COMPARISON_QUERY_PATTERNS) {
            QueryCategory::Comparison
        } else if contains_any(&lexicon::EXPLANATION_QUERY_PATTERNS) {
            QueryCategory::Explanation
        } else if contains_any(&lexicon::CREATIVE_QUERY_PATTERNS) {
            QueryCategory::Creative
        } else if contains_any(&lexicon::TECHNICAL_QUERY_PATTERNS) {
            QueryCategory::Technical
        } else if contains_any(&lexicon::FACTUAL_QUERY_PATTERNS) {
            QueryCategory::Factual
        } else if contains_any(&lexicon::REASONING_QUERY_PATTERNS) {
            QueryCategory::Reasoning
        } else {
            QueryCategory::General
        }
    }
}

impl Default for QueryCategory {
    fn default() -> Self {
        QueryCategory::General
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QueryCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "factual" | "knowledge" => Ok(QueryCategory::Factual),
            "technical" | "coding" | "code" => Ok(QueryCategory::Technical),
            "creative" => Ok(QueryCategory::Creative),
            "comparison" | "compare" => Ok(QueryCategory::Comparison),
            "explanation" | "explain" => Ok(QueryCategory::Explanation),
            "reasoning" | "research" | "analysis" => Ok(QueryCategory::Reasoning),
            "general" => Ok(QueryCategory::General),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}
