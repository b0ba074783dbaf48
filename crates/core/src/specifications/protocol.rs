use async_trait::async_trait;

use crate::decision::{RejectionType, Verdict};
use crate::release::{format_set, CandidateRelease, SearchCriteria};
use crate::specification::{fail_open, Specification, SpecificationError};

/// Rejects releases using a transport the profile does not allow.
///
/// An empty protocol set allows everything. Releases with an unknown
/// protocol are accepted.
#[derive(Debug, Default)]
pub struct ProtocolSpecification;

impl ProtocolSpecification {
    pub const NAME: &'static str = "protocol";
}

#[async_trait]
impl Specification for ProtocolSpecification {
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
        Ok(fail_open::require_known(
            fail_open::configured(&criteria.protocols),
            candidate.protocol.known(),
            |allowed, protocol| {
                if allowed.contains(&protocol) {
                    Verdict::Accept
                } else {
                    Verdict::reject(format!(
                        "{} is not an allowed protocol. Allowed protocols: {}",
                        protocol,
                        format_set(allowed)
                    ))
                }
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Protocol;
    use crate::testing::fixtures;

    fn torrent_only() -> SearchCriteria {
        let mut criteria = SearchCriteria::new("Alien");
        criteria.protocols.insert(Protocol::Torrent);
        criteria
    }

    #[tokio::test]
    async fn test_disallowed_protocol_rejects() {
        let candidate = fixtures::usenet_release("a", "Alien");
        let verdict = ProtocolSpecification
            .is_satisfied_by(&candidate, &torrent_only())
            .await
            .unwrap();
        assert_eq!(
            verdict,
            Verdict::reject("usenet is not an allowed protocol. Allowed protocols: [torrent]")
        );
    }

    #[tokio::test]
    async fn test_allowed_or_unknown_protocol_accepts() {
        let spec = ProtocolSpecification;
        let torrent = fixtures::torrent_release("a", "Alien");
        let unknown = CandidateRelease::new("b", "Alien");

        assert!(spec.is_satisfied_by(&torrent, &torrent_only()).await.unwrap().is_accept());
        assert!(spec.is_satisfied_by(&unknown, &torrent_only()).await.unwrap().is_accept());
    }

    #[tokio::test]
    async fn test_no_allowed_protocols_accepts_anything() {
        let usenet = fixtures::usenet_release("a", "Alien");
        let criteria = SearchCriteria::new("Alien");
        let verdict = ProtocolSpecification
            .is_satisfied_by(&usenet, &criteria)
            .await
            .unwrap();
        assert!(verdict.is_accept());
    }
}
