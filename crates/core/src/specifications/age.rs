//! Usenet age rules. Both measure age against `SearchCriteria::evaluated_at`
//! so every candidate in a cycle sees the same clock.

use async_trait::async_trait;
use chrono::Duration;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{
    fail_open, Capabilities, Capability, Specification, SpecificationError,
    SpecificationPriority,
};

/// Rejects usenet releases older than the download client's retention.
#[derive(Debug, Default)]
pub struct RetentionSpecification;

impl RetentionSpecification {
    pub const NAME: &'static str = "retention";
}

#[async_trait]
impl Specification for RetentionSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    fn priority(&self) -> SpecificationPriority {
        SpecificationPriority::Computed
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities::of(&[Capability::Usenet])
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        let retention = criteria.retention_days.filter(|days| *days > 0);

        Ok(fail_open::require_known(
            retention,
            candidate.age_at(criteria.evaluated_at),
            |retention, age| {
                let age_days = age.num_days();
                if age_days > i64::from(retention) {
                    Verdict::reject(format!(
                        "Older than configured retention: {} days > {} days",
                        age_days, retention
                    ))
                } else {
                    Verdict::Accept
                }
            },
        ))
    }
}

/// Holds back usenet releases that are too fresh to be fully propagated.
/// Rejections are temporary; the release is reconsidered on a later cycle.
#[derive(Debug, Default)]
pub struct MinimumAgeSpecification;

impl MinimumAgeSpecification {
    pub const NAME: &'static str = "minimum_age";
}

#[async_trait]
impl Specification for MinimumAgeSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Temporary
    }

    fn priority(&self) -> SpecificationPriority {
        SpecificationPriority::Computed
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities::of(&[Capability::Usenet])
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        let minimum = criteria.minimum_age_minutes.filter(|minutes| *minutes > 0);

        Ok(fail_open::require_known(
            minimum,
            candidate.age_at(criteria.evaluated_at),
            |minimum, age| {
                if age < Duration::minutes(i64::from(minimum)) {
                    Verdict::reject(format!(
                        "Only {} minutes old, minimum age is {} minutes",
                        age.num_minutes(),
                        minimum
                    ))
                } else {
                    Verdict::Accept
                }
            },
        ))
    }
}
