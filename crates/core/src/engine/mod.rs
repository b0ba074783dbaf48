//! Decision engine.
//!
//! Runs every candidate of a search cycle through the specification
//! registry and reports one decision per candidate.

mod config;
mod driver;
mod types;
mod validate;

pub use config::EngineConfig;
pub use driver::{DecisionEngine, CANCELLED_MESSAGE, ENGINE_REJECTION};
pub use types::EngineError;
pub use validate::validate_batch;
