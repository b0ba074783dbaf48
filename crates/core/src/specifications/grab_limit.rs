use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::decision::{RejectionType, Verdict};
use crate::quota::{GrabQuota, QuotaError, QuotaStatus};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{
    fail_open, Capabilities, Capability, Specification, SpecificationError,
    SpecificationPriority,
};

/// Rejects releases from indexers that have used up their grab quota.
///
/// The quota refills over time, so rejections are temporary. A quota
/// lookup that does not answer within `timeout` also rejects temporarily.
pub struct IndexerGrabLimitSpecification {
    quota: Arc<dyn GrabQuota>,
    timeout: Duration,
}

impl IndexerGrabLimitSpecification {
    pub const NAME: &'static str = "indexer_grab_limit";

    pub fn new(quota: Arc<dyn GrabQuota>, timeout: Duration) -> Self {
        Self { quota, timeout }
    }

    async fn check_quota(&self, indexer: &str) -> Result<Verdict, SpecificationError> {
        let status = match tokio::time::timeout(self.timeout, self.quota.check(indexer)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    quota = self.quota.name(),
                    indexer = indexer,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Grab quota lookup timed out"
                );
                return Ok(Verdict::reject(format!(
                    "Grab quota for {} did not answer within {}ms",
                    indexer,
                    self.timeout.as_millis()
                )));
            }
        };

        match status {
            Ok(QuotaStatus::Unlimited) | Ok(QuotaStatus::Available { .. }) => Ok(Verdict::Accept),
            Ok(QuotaStatus::Exhausted {
                limit,
                retry_after_ms,
            }) => Ok(Verdict::reject(format!(
                "Indexer {} reached its grab limit of {} per hour, retry in {}s",
                indexer,
                limit,
                retry_after_ms.div_ceil(1000)
            ))),
            Err(QuotaError::LimitReached { retry_after_ms, .. }) => Ok(Verdict::reject(format!(
                "Indexer {} reached its grab limit, retry in {}s",
                indexer,
                retry_after_ms.div_ceil(1000)
            ))),
            Err(e @ QuotaError::Unavailable(_)) => {
                Err(SpecificationError::Collaborator(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Specification for IndexerGrabLimitSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Temporary
    }

    fn priority(&self) -> SpecificationPriority {
        SpecificationPriority::Collaborator
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities::of(&[Capability::IndexerIdentity])
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        _criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        fail_open::require_present(candidate.indexer_name(), |indexer| {
            self.check_quota(indexer)
        })
        .await
    }
}
