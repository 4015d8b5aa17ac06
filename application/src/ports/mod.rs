//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod exchange_log;
pub mod model_client;
pub mod progress;
