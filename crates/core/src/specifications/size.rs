use async_trait::async_trait;
use humansize::{format_size, BINARY};

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{fail_open, Specification, SpecificationError};

/// Rejects releases outside the profile's size range.
#[derive(Debug, Default)]
pub struct AcceptableSizeSpecification;

impl AcceptableSizeSpecification {
    pub const NAME: &'static str = "size";
}

#[async_trait]
impl Specification for AcceptableSizeSpecification {
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
        let limits = Some(criteria.size).filter(|l| !l.is_unbounded());

        Ok(fail_open::require_known(
            limits,
            candidate.size_bytes,
            |limits, size| {
                if let Some(min) = limits.min_bytes.filter(|min| size < *min) {
                    return Verdict::reject(format!(
                        "{} is smaller than minimum allowed {}",
                        format_size(size, BINARY),
                        format_size(min, BINARY)
                    ));
                }
                if let Some(max) = limits.max_bytes.filter(|max| size > *max) {
                    return Verdict::reject(format!(
                        "{} is larger than maximum allowed {}",
                        format_size(size, BINARY),
                        format_size(max, BINARY)
                    ));
                }
                Verdict::Accept
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::SizeLimits;
    use crate::testing::fixtures;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn criteria(min: Option<u64>, max: Option<u64>) -> SearchCriteria {
        let mut criteria = SearchCriteria::new("Alien");
        criteria.size = SizeLimits {
            min_bytes: min,
            max_bytes: max,
        };
        criteria
    }

    async fn verdict(size: Option<u64>, criteria: &SearchCriteria) -> Verdict {
        let mut candidate = fixtures::usenet_release("a", "Alien.1979.2160p");
        candidate.size_bytes = size;
        AcceptableSizeSpecification
            .is_satisfied_by(&candidate, criteria)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_within_range_accepts() {
        let criteria = criteria(Some(GIB), Some(10 * GIB));
        assert!(verdict(Some(4 * GIB), &criteria).await.is_accept());
        assert!(verdict(Some(GIB), &criteria).await.is_accept());
        assert!(verdict(Some(10 * GIB), &criteria).await.is_accept());
    }

    #[tokio::test]
    async fn test_too_small_rejects() {
        let criteria = criteria(Some(2 * GIB), None);
        let expected = format!(
            "{} is smaller than minimum allowed {}",
            format_size(GIB, BINARY),
            format_size(2 * GIB, BINARY)
        );
        assert_eq!(verdict(Some(GIB), &criteria).await, Verdict::reject(expected));
    }

    #[tokio::test]
    async fn test_too_large_rejects() {
        let criteria = criteria(None, Some(GIB));
        match verdict(Some(3 * GIB), &criteria).await {
            Verdict::Reject(message) => assert!(message.contains("larger than maximum")),
            Verdict::Accept => panic!("Expected rejection"),
        }
    }

    #[tokio::test]
    async fn test_unknown_size_or_no_limits_accepts() {
        assert!(verdict(None, &criteria(Some(GIB), None)).await.is_accept());
        assert!(verdict(Some(GIB), &criteria(None, None)).await.is_accept());
    }
}
