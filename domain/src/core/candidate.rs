//! Candidate response value objects

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a model produced no usable response.
///
/// Candidate errors are data, not control flow: they ride along in the
/// candidate, get excluded from scoring, and surface in verdict metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum CandidateError {
    /// The call did not complete within the per-call timeout
    #[error("model call timed out")]
    Timeout,

    /// The model returned an empty or whitespace-only reply
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The call failed outright (transport error, missing client, refusal)
    #[error("model call failed: {0}")]
    CallFailed(String),
}

/// What came back from one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOutcome {
    /// The model answered with this text
    Answered(String),
    /// The model produced no usable response
    Failed(CandidateError),
}

/// One model's reply to the query, successful or not (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResponse {
    /// Raw model name exactly as the caller requested it
    pub model: String,
    pub outcome: CandidateOutcome,
    /// Wall-clock call duration, when the caller measured one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CandidateResponse {
    /// Create a successful candidate
    pub fn answered(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            outcome: CandidateOutcome::Answered(text.into()),
            latency_ms: None,
        }
    }

    /// Create a failed candidate
    pub fn failed(model: impl Into<String>, error: CandidateError) -> Self {
        Self {
            model: model.into(),
            outcome: CandidateOutcome::Failed(error),
            latency_ms: None,
        }
    }

    /// Attach a measured call latency
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// The answer text, if the model produced a non-blank one
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            CandidateOutcome::Answered(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }

    /// The failure, if the model produced no usable response
    pub fn error(&self) -> Option<&CandidateError> {
        match &self.outcome {
            CandidateOutcome::Failed(error) => Some(error),
            CandidateOutcome::Answered(_) => None,
        }
    }

    /// Whether this candidate can enter scoring
    pub fn is_valid(&self) -> bool {
        self.text().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_candidate() {
        let candidate = CandidateResponse::answered("gpt-4o", "Paris is the capital of France.");
        assert!(candidate.is_valid());
        assert_eq!(candidate.text(), Some("Paris is the capital of France."));
        assert!(candidate.error().is_none());
    }

    #[test]
    fn test_blank_answer_is_invalid() {
        let candidate = CandidateResponse::answered("gpt-4o", "   \n ");
        assert!(!candidate.is_valid());
        assert!(candidate.text().is_none());
    }

    #[test]
    fn test_failed_candidate() {
        let candidate = CandidateResponse::failed("mistral-large", CandidateError::Timeout);
        assert!(!candidate.is_valid());
        assert_eq!(candidate.error(), Some(&CandidateError::Timeout));
    }

    #[test]
    fn test_latency_builder() {
        let candidate = CandidateResponse::answered("gpt-4o", "hi there").with_latency_ms(420);
        assert_eq!(candidate.latency_ms, Some(420));
    }

    #[test]
    fn test_candidate_serializes() {
        let candidate = CandidateResponse::failed(
            "claude-3-opus",
            CandidateError::CallFailed("socket closed".to_string()),
        );
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["model"], "claude-3-opus");
        assert_eq!(json["outcome"]["failed"]["call_failed"], "socket closed");
    }
}
