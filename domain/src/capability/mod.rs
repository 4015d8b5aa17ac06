//! Model identity and per-category capability weights.
//!
//! - [`model::CanonicalModel`]: total name normalization plus pricing
//! - [`table::CapabilityTable`]: (model, category) weight lookup with
//!   fallbacks and the offline EMA tuner

pub mod model;
pub mod table;

pub use model::{CanonicalModel, REFERENCE_COST_PER_1K};
pub use table::{CapabilityTable, DEFAULT_CAPABILITY_WEIGHT};
