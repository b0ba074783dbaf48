//! Verdicts produced by specifications and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::release::CandidateRelease;

/// Whether a rejection can change on a later search cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RejectionType {
    /// The release can never satisfy the rule for these criteria.
    Permanent,
    /// The condition may clear later (quota, seeders, release age, faults).
    Temporary,
}

impl fmt::Display for RejectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionType::Permanent => f.write_str("permanent"),
            RejectionType::Temporary => f.write_str("temporary"),
        }
    }
}

/// One explanation for a rejection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectionReason {
    /// Name of the specification that rejected.
    pub specification: String,
    pub severity: RejectionType,
    /// Human-readable message including compared values.
    pub message: String,
}

impl RejectionReason {
    pub fn new(
        specification: impl Into<String>,
        severity: RejectionType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            specification: specification.into(),
            severity,
            message: message.into(),
        }
    }

    pub fn permanent(specification: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(specification, RejectionType::Permanent, message)
    }

    pub fn temporary(specification: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(specification, RejectionType::Temporary, message)
    }

    pub fn is_permanent(&self) -> bool {
        self.severity == RejectionType::Permanent
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.specification, self.message)
    }
}

/// What a single specification concluded, before severity is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(String),
}

impl Verdict {
    pub fn reject(message: impl Into<String>) -> Self {
        Verdict::Reject(message.into())
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Aggregated accept/reject verdict.
///
/// `accepted` is true exactly when `rejections` is empty; the fields are
/// private so the invariant holds for every constructed value.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Decision {
    accepted: bool,
    rejections: Vec<RejectionReason>,
}

impl Decision {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            rejections: Vec::new(),
        }
    }

    pub fn reject(reason: RejectionReason) -> Self {
        Self {
            accepted: false,
            rejections: vec![reason],
        }
    }

    pub fn from_rejections(rejections: Vec<RejectionReason>) -> Self {
        Self {
            accepted: rejections.is_empty(),
            rejections,
        }
    }

    /// Build a new decision holding the reasons of all `decisions`, in order.
    pub fn combine<I>(decisions: I) -> Self
    where
        I: IntoIterator<Item = Decision>,
    {
        Self::from_rejections(
            decisions
                .into_iter()
                .flat_map(|d| d.rejections)
                .collect(),
        )
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn rejections(&self) -> &[RejectionReason] {
        &self.rejections
    }

    pub fn into_rejections(self) -> Vec<RejectionReason> {
        self.rejections
    }

    /// True if any reason is permanent.
    pub fn is_permanently_rejected(&self) -> bool {
        self.rejections.iter().any(RejectionReason::is_permanent)
    }

    /// True if rejected and every reason is temporary, i.e. worth retrying.
    pub fn is_temporarily_rejected(&self) -> bool {
        !self.accepted && !self.is_permanently_rejected()
    }
}

impl<'de> Deserialize<'de> for Decision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            rejections: Vec<RejectionReason>,
        }

        // `accepted` is derived, never trusted from input.
        let raw = Raw::deserialize(deserializer)?;
        Ok(Decision::from_rejections(raw.rejections))
    }
}

/// A candidate paired with its final decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDecision {
    pub candidate: CandidateRelease,
    pub decision: Decision,
}

impl ReleaseDecision {
    pub fn is_accepted(&self) -> bool {
        self.decision.accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_has_no_rejections() {
        let decision = Decision::accept();
        assert!(decision.accepted());
        assert!(decision.rejections().is_empty());
        assert!(!decision.is_temporarily_rejected());
    }

    #[test]
    fn test_from_rejections_keeps_invariant() {
        assert!(Decision::from_rejections(vec![]).accepted());

        let decision =
            Decision::from_rejections(vec![RejectionReason::temporary("quota", "limit hit")]);
        assert!(!decision.accepted());
        assert!(decision.is_temporarily_rejected());
        assert!(!decision.is_permanently_rejected());
    }

    #[test]
    fn test_combine_preserves_order() {
        let decision = Decision::combine(vec![
            Decision::reject(RejectionReason::temporary("a", "first")),
            Decision::accept(),
            Decision::reject(RejectionReason::permanent("b", "second")),
        ]);

        assert!(!decision.accepted());
        let names: Vec<_> = decision
            .rejections()
            .iter()
            .map(|r| r.specification.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(decision.is_permanently_rejected());
        assert!(!decision.is_temporarily_rejected());
    }

    #[test]
    fn test_combine_of_accepts_is_accept() {
        let decision = Decision::combine(vec![Decision::accept(), Decision::accept()]);
        assert!(decision.accepted());
    }

    #[test]
    fn test_deserialize_derives_accepted() {
        let json = r#"{"accepted": true, "rejections": [
            {"specification": "size", "severity": "permanent", "message": "too big"}
        ]}"#;
        let decision: Decision = serde_json::from_str(json).unwrap();
        assert!(!decision.accepted());
        assert_eq!(decision.rejections().len(), 1);
    }

    #[test]
    fn test_rejection_display() {
        let reason = RejectionReason::permanent("size", "too big");
        assert_eq!(reason.to_string(), "[permanent] size: too big");
    }

    #[test]
    fn test_serialized_decision_has_accepted_field() {
        let json = serde_json::to_string(&Decision::accept()).unwrap();
        assert_eq!(json, r#"{"accepted":true,"rejections":[]}"#);
    }
}
