//! Progress notification port
//!
//! Defines the interface for reporting progress during an ensemble round.

use chorus_domain::BlendDecision;

/// Callback for progress updates during ensemble execution.
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.). Every hook defaults
/// to a no-op so implementors pick only what they need.
pub trait EnsembleProgress: Send + Sync {
    /// Called once before the query fans out, with the number of models
    fn on_fanout_start(&self, _total: usize) {}

    /// Called as each model call finishes, successfully or not
    fn on_model_complete(&self, _model: &str, _success: bool) {}

    /// Called after ranking with the number of usable candidates
    fn on_ranking_complete(&self, _valid: usize) {}

    /// Called with the blend gate's decision
    fn on_blend_decision(&self, _decision: &BlendDecision) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl EnsembleProgress for NoProgress {}
