//! Ensemble parameters: fan-out control.
//!
//! [`EnsembleParams`] groups the static parameters that control how
//! [`RunEnsembleUseCase`](crate::use_cases::run_ensemble::RunEnsembleUseCase)
//! fans a query out. These are application-layer concerns, not domain
//! policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-model call timeout, in seconds
pub const DEFAULT_PER_CALL_TIMEOUT_SECS: u64 = 20;

/// Fan-out control parameters.
///
/// A timed-out model becomes a failed candidate; it never takes the whole
/// round down with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleParams {
    /// Timeout for each individual model call. `None` waits indefinitely.
    pub per_call_timeout: Option<Duration>,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            per_call_timeout: Some(Duration::from_secs(DEFAULT_PER_CALL_TIMEOUT_SECS)),
        }
    }
}

impl EnsembleParams {
    pub fn with_per_call_timeout(mut self, timeout: Duration) -> Self {
        self.per_call_timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.per_call_timeout = None;
        self
    }
}
