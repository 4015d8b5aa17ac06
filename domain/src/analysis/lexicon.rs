//! Fixed keyword tables driving classification and quality heuristics.
//!
//! Every heuristic in the analysis pipeline matches against one of these
//! lists, always on lowercased text. Keeping them in one place makes the
//! behavior auditable: a scoring change is a diff to a table, not to logic.

// ==================== Query classification ====================

/// Marks a comparison query ("X vs Y", "difference between")
pub const COMPARISON_QUERY_PATTERNS: [&str; 10] = [
    "compare",
    " versus ",
    " vs ",
    " vs.",
    "difference between",
    "better than",
    "which is better",
    "pros and cons",
    "trade-off",
    "tradeoff",
];

/// Marks an explanation query; checked before the technical bucket so
/// "explain recursion" does not land in `Technical`
pub const EXPLANATION_QUERY_PATTERNS: [&str; 7] = [
    "explain",
    "how does",
    "why does",
    "why is",
    "why are",
    "walk me through",
    "in simple terms",
];

/// Marks a creative-writing query
pub const CREATIVE_QUERY_PATTERNS: [&str; 8] = [
    "write a story",
    "short story",
    "write a poem",
    "poem",
    "haiku",
    "song lyrics",
    "imagine a",
    "fictional",
];

/// Marks a technical/coding query
pub const TECHNICAL_QUERY_PATTERNS: [&str; 10] = [
    "implement",
    "write a function",
    "code",
    "debug",
    "algorithm",
    "compile",
    "refactor",
    "stack trace",
    "error message",
    "script",
];

/// Marks a factual lookup question; also drives the template-phrase kill
/// switch via [`Query::is_factual`](crate::core::query::Query::is_factual)
pub const FACTUAL_QUERY_PATTERNS: [&str; 13] = [
    "what is ",
    "what are ",
    "who is ",
    "who was ",
    "who wrote",
    "when did ",
    "when was ",
    "where is ",
    "capital of",
    "how many ",
    "how much ",
    "definition of",
    "define ",
];

/// Marks an analysis/research query
pub const REASONING_QUERY_PATTERNS: [&str; 8] = [
    "analyze",
    "analyse",
    "evaluate",
    "prove ",
    "step by step",
    "reason about",
    "research",
    "solve",
];

/// Technical vocabulary that raises the complexity estimate
pub const TECHNICAL_TERMS: [&str; 16] = [
    "algorithm",
    "architecture",
    "async",
    "compiler",
    "concurrency",
    "database",
    "distributed",
    "encryption",
    "framework",
    "kernel",
    "latency",
    "optimization",
    "protocol",
    "recursion",
    "runtime",
    "thread",
];

// ==================== Quality scoring ====================

/// Common words excluded from relevance terms and significant-word sets.
/// Only words longer than 3 characters matter to the filters, but the
/// short ones are kept so the list reads as one coherent set.
pub const STOPWORDS: [&str; 48] = [
    "the", "and", "for", "that", "this", "with", "what", "when", "where", "which", "whom",
    "whose", "will", "would", "could", "should", "does", "have", "from", "about", "into",
    "over", "after", "under", "between", "against", "during", "without", "before", "around",
    "among", "their", "there", "them", "then", "than", "your", "these", "those", "some",
    "such", "only", "also", "very", "just", "more", "most", "other",
];

/// Discourse transitions that raise the coherence score
pub const TRANSITION_WORDS: [&str; 17] = [
    "however",
    "therefore",
    "furthermore",
    "moreover",
    "additionally",
    "consequently",
    "in addition",
    "for example",
    "for instance",
    "in contrast",
    "on the other hand",
    "as a result",
    "in conclusion",
    "first",
    "second",
    "finally",
    "meanwhile",
];

/// AI self-reference phrases that lower coherence
pub const SELF_REFERENCE_PHRASES: [&str; 8] = [
    "as an ai ",
    "as an ai,",
    "as an ai.",
    "i am an ai",
    "i'm an ai",
    "as a language model",
    "i am a language model",
    "i'm a language model",
];

/// Generic filler openers that signal a templated non-answer
pub const TEMPLATE_PHRASES: [&str; 8] = [
    "here's what i know",
    "here is what i know",
    "a few important points",
    "in response to your question",
    "here are the key points",
    "here's a breakdown of",
    "let me break this down",
    "i'd be happy to help with that",
];

/// Words signalling a confident register
pub const CONFIDENCE_WORDS: [&str; 12] = [
    "definitely",
    "certainly",
    "clearly",
    "precisely",
    "specifically",
    "exactly",
    "undoubtedly",
    "confirmed",
    "established",
    "proven",
    "indeed",
    "without a doubt",
];

/// Words and hedges signalling an uncertain register
pub const UNCERTAINTY_WORDS: [&str; 16] = [
    "maybe",
    "perhaps",
    "possibly",
    "might be",
    "could be",
    "not sure",
    "unclear",
    "uncertain",
    "unsure",
    "i think",
    "i believe",
    "probably",
    "it seems",
    "appears to",
    "speculation",
    "roughly",
];

/// Endings that mark a response as cut off mid-thought
pub const TRUNCATION_MARKERS: [&str; 5] = [
    "...",
    "\u{2026}",
    "to be continued",
    "[truncated]",
    "continued in next",
];

// ==================== Blending ====================

/// Sentence markers the comparison blend collects across models
pub const COMPARISON_KEYWORDS: [&str; 17] = [
    "compared",
    "comparison",
    "versus",
    " vs ",
    "better",
    "worse",
    "advantage",
    "disadvantage",
    "whereas",
    "in contrast",
    "on the other hand",
    "stronger",
    "weaker",
    "faster",
    "slower",
    "cheaper",
    "more efficient",
];

/// Paragraph markers the technical blend splices a code block after
pub const CODE_CONTEXT_WORDS: [&str; 4] = ["code", "implementation", "example", "solution"];
