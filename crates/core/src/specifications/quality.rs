use async_trait::async_trait;

use crate::decision::{RejectionType, Verdict};
use crate::release::{format_set, CandidateRelease, SearchCriteria};
use crate::specification::{fail_open, Specification, SpecificationError};

/// Rejects releases whose quality is not allowed by the profile.
#[derive(Debug, Default)]
pub struct QualityAllowedSpecification;

impl QualityAllowedSpecification {
    pub const NAME: &'static str = "quality";
}

#[async_trait]
impl Specification for QualityAllowedSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        let allowed = Some(&criteria.qualities).filter(|q| !q.is_empty());

        Ok(fail_open::require_known(
            allowed,
            candidate.quality.as_ref(),
            |allowed, quality| {
                if allowed.contains(quality) {
                    Verdict::Accept
                } else {
                    Verdict::reject(format!(
                        "Quality {} is not wanted in profile. Allowed qualities: {}",
                        quality,
                        format_set(allowed)
                    ))
                }
            },
        ))
    }
}
