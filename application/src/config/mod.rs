//! Application-level configuration.
//!
//! Configuration types that control how use cases behave:
//!
//! - [`EnsembleParams`]: fan-out control (per-call timeout)

pub mod ensemble_params;

pub use ensemble_params::{DEFAULT_PER_CALL_TIMEOUT_SECS, EnsembleParams};
