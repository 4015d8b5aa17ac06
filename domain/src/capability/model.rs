//! Canonical model identity and pricing

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reference per-1000-token cost ceiling used to normalize cost efficiency.
/// Matches the most expensive model in the catalog, so efficiency spans the
/// full [0, 1] range.
pub const REFERENCE_COST_PER_1K: f64 = 0.030;

/// Per-1000-token cost assumed for models outside the catalog
const UNKNOWN_COST_PER_1K: f64 = 0.010;

/// Canonical identity of a chat model (Value Object)
///
/// Providers spell model names a dozen ways (`GPT-4o`, `openai/gpt-4o`,
/// `gpt4o-2024-05`); capability lookup and pricing key off one canonical
/// form. [`CanonicalModel::normalize`] is total: any string maps to a
/// catalog entry or to the `Unknown` bucket, never to an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalModel {
    // OpenAI models
    Gpt4o,
    Gpt4Turbo,
    Gpt4,
    Gpt35Turbo,
    // Anthropic models
    Claude3Opus,
    Claude3Sonnet,
    Claude3Haiku,
    // Mistral models
    MistralLarge,
    MistralMedium,
    MistralSmall,
    // In-process simulator backends
    LocalSim,
    // Anything else, lowercased
    Unknown(String),
}

impl CanonicalModel {
    /// Get the canonical string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalModel::Gpt4o => "gpt-4o",
            CanonicalModel::Gpt4Turbo => "gpt-4-turbo",
            CanonicalModel::Gpt4 => "gpt-4",
            CanonicalModel::Gpt35Turbo => "gpt-3.5-turbo",
            CanonicalModel::Claude3Opus => "claude-3-opus",
            CanonicalModel::Claude3Sonnet => "claude-3-sonnet",
            CanonicalModel::Claude3Haiku => "claude-3-haiku",
            CanonicalModel::MistralLarge => "mistral-large",
            CanonicalModel::MistralMedium => "mistral-medium",
            CanonicalModel::MistralSmall => "mistral-small",
            CanonicalModel::LocalSim => "local-sim",
            CanonicalModel::Unknown(s) => s,
        }
    }

    /// Every catalog model (everything except the `Unknown` bucket)
    pub fn known_models() -> Vec<CanonicalModel> {
        vec![
            CanonicalModel::Gpt4o,
            CanonicalModel::Gpt4Turbo,
            CanonicalModel::Gpt4,
            CanonicalModel::Gpt35Turbo,
            CanonicalModel::Claude3Opus,
            CanonicalModel::Claude3Sonnet,
            CanonicalModel::Claude3Haiku,
            CanonicalModel::MistralLarge,
            CanonicalModel::MistralMedium,
            CanonicalModel::MistralSmall,
            CanonicalModel::LocalSim,
        ]
    }

    /// Map an arbitrary model name onto the catalog.
    ///
    /// Matching is family-then-tier on the lowercased, trimmed name. Bare
    /// family names resolve to the strongest tier (`claude` → Claude3Opus,
    /// `mistral` → MistralLarge). Names matching nothing land in
    /// `Unknown`, carrying the lowercased original; blank names land in
    /// `Unknown("unknown")`. Never panics.
    pub fn normalize(raw: &str) -> CanonicalModel {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            return CanonicalModel::Unknown("unknown".to_string());
        }
        if name.contains("gpt-4o") || name.contains("gpt4o") {
            CanonicalModel::Gpt4o
        } else if (name.contains("gpt-4") || name.contains("gpt4")) && name.contains("turbo") {
            CanonicalModel::Gpt4Turbo
        } else if name.contains("gpt-4") || name.contains("gpt4") {
            CanonicalModel::Gpt4
        } else if name.contains("gpt") && (name.contains("3.5") || name.contains("turbo")) {
            CanonicalModel::Gpt35Turbo
        } else if name.contains("claude") {
            if name.contains("sonnet") {
                CanonicalModel::Claude3Sonnet
            } else if name.contains("haiku") {
                CanonicalModel::Claude3Haiku
            } else {
                CanonicalModel::Claude3Opus
            }
        } else if name.contains("mistral") {
            if name.contains("medium") {
                CanonicalModel::MistralMedium
            } else if name.contains("small") || name.contains("tiny") {
                CanonicalModel::MistralSmall
            } else {
                CanonicalModel::MistralLarge
            }
        } else if name.contains("local") || name.contains("simulator") || name.starts_with("sim-") {
            CanonicalModel::LocalSim
        } else {
            CanonicalModel::Unknown(name)
        }
    }

    /// Whether this model is in the catalog
    pub fn is_known(&self) -> bool {
        !matches!(self, CanonicalModel::Unknown(_))
    }

    /// Assumed cost per 1000 tokens, in dollars.
    ///
    /// Flat blended rates, good enough for relative cost ranking; the
    /// simulator backend is free.
    pub fn cost_per_1k_tokens(&self) -> f64 {
        match self {
            CanonicalModel::Gpt4o => 0.005,
            CanonicalModel::Gpt4Turbo => 0.010,
            CanonicalModel::Gpt4 => 0.030,
            CanonicalModel::Gpt35Turbo => 0.0005,
            CanonicalModel::Claude3Opus => 0.015,
            CanonicalModel::Claude3Sonnet => 0.003,
            CanonicalModel::Claude3Haiku => 0.00025,
            CanonicalModel::MistralLarge => 0.008,
            CanonicalModel::MistralMedium => 0.0027,
            CanonicalModel::MistralSmall => 0.001,
            CanonicalModel::LocalSim => 0.0,
            CanonicalModel::Unknown(_) => UNKNOWN_COST_PER_1K,
        }
    }

    /// Cost efficiency in [0, 1]: free models score 1.0, models at the
    /// reference ceiling score 0.0
    pub fn cost_efficiency(&self) -> f64 {
        (1.0 - self.cost_per_1k_tokens() / REFERENCE_COST_PER_1K).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for CanonicalModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CanonicalModel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(CanonicalModel::normalize(s))
    }
}

impl Serialize for CanonicalModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CanonicalModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(CanonicalModel::normalize(&s))
    }
}
