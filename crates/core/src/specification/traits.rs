use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};

use super::capability::Capabilities;

/// Failures of a specification to execute (not rejections).
///
/// The engine never propagates these; they become temporary rejections.
#[derive(Debug, Error)]
pub enum SpecificationError {
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("Collaborator unavailable: {0}")]
    Collaborator(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Cost tier used to order specifications. Cheaper tiers run first.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum SpecificationPriority {
    /// Pure string/flag/enum comparisons.
    #[default]
    Local,
    /// Needs some computation (regexes, date arithmetic).
    Computed,
    /// Calls an injected collaborator (quota service, ...).
    Collaborator,
}

/// A single accept/reject rule.
///
/// Implementations inspect only the fields they care about and never
/// reference other specifications. When the data they need is unknown, or
/// the constraint they check is not configured, they accept.
#[async_trait]
pub trait Specification: Send + Sync {
    /// Stable name, used in rejection reasons, logs and configuration.
    fn name(&self) -> &str;

    /// Severity of every rejection this specification produces.
    fn rejection_type(&self) -> RejectionType;

    fn priority(&self) -> SpecificationPriority {
        SpecificationPriority::Local
    }

    /// Capabilities a candidate must expose for this rule to apply.
    fn required_capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    /// Judge `candidate` against `criteria`.
    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(SpecificationPriority::Local < SpecificationPriority::Computed);
        assert!(SpecificationPriority::Computed < SpecificationPriority::Collaborator);
    }

    #[test]
    fn test_error_display() {
        let err = SpecificationError::Collaborator("quota service down".to_string());
        assert_eq!(err.to_string(), "Collaborator unavailable: quota service down");
    }
}
