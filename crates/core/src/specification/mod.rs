//! The specification contract and its registry.
//!
//! A specification is one independent business rule. The registry keeps
//! them ordered by cost so cheap local checks run before checks that call
//! collaborators, and the engine short-circuits on the first permanent
//! rejection.

mod capability;
pub mod fail_open;
mod registry;
mod traits;

pub use capability::{Capabilities, Capability};
pub use registry::{RegisteredSpecification, RegistryBuilder, SpecificationRegistry};
pub use traits::{Specification, SpecificationError, SpecificationPriority};
