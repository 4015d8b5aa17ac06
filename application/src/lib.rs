//! Application layer for chorus
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer; concrete model
//! transports and sinks are supplied by callers through the ports.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_PER_CALL_TIMEOUT_SECS, EnsembleParams};
pub use ports::exchange_log::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
pub use ports::model_client::{ClientRegistry, ModelCallError, ModelClient};
pub use ports::progress::{EnsembleProgress, NoProgress};
pub use use_cases::run_ensemble::{RunEnsembleError, RunEnsembleInput, RunEnsembleUseCase};
