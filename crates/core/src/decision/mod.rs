//! Decisions and rejection reasons.

mod types;

pub use types::{Decision, RejectionReason, RejectionType, ReleaseDecision, Verdict};
