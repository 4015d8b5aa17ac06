//! Domain error types

use thiserror::Error;

/// Errors raised by domain-level operations.
///
/// Candidate failures (timeouts, empty replies, transport errors) are *not*
/// domain errors: they travel inside
/// [`CandidateOutcome`](crate::core::candidate::CandidateOutcome) so a bad
/// response never aborts a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A category string did not match any known category or alias
    #[error("Unknown query category: {0}")]
    UnknownCategory(String),

    /// A capability weight outside the valid [0.0, 1.0] range
    #[error("Capability weight out of range: {0}")]
    InvalidWeight(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::UnknownCategory("poetry".to_string());
        assert!(err.to_string().contains("poetry"));

        let err = DomainError::InvalidWeight(1.5);
        assert!(err.to_string().contains("1.5"));
    }
}
