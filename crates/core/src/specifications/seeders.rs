use async_trait::async_trait;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{
    fail_open, Capabilities, Capability, Specification, SpecificationError,
};

/// Rejects torrents with too few seeders. Seeder counts change, so the
/// rejection is temporary.
///
/// The indexer's own minimum, when set, overrides the profile's.
#[derive(Debug, Default)]
pub struct MinimumSeedersSpecification;

impl MinimumSeedersSpecification {
    pub const NAME: &'static str = "minimum_seeders";
}

#[async_trait]
impl Specification for MinimumSeedersSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Temporary
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities::of(&[Capability::Torrent])
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        let minimum = candidate
            .indexer_settings()
            .and_then(|s| s.minimum_seeders)
            .or(criteria.minimum_seeders)
            .filter(|min| *min > 0);

        Ok(fail_open::require_known(
            minimum,
            candidate.seeders,
            |minimum, seeders| {
                if seeders < minimum {
                    Verdict::reject(format!(
                        "Not enough seeders: {}. Minimum seeders: {}",
                        seeders, minimum
                    ))
                } else {
                    Verdict::Accept
                }
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::IndexerSettings;
    use crate::testing::fixtures;

    fn criteria(minimum: Option<u32>) -> SearchCriteria {
        let mut criteria = SearchCriteria::new("Ran");
        criteria.minimum_seeders = minimum;
        criteria
    }

    #[tokio::test]
    async fn test_too_few_seeders_rejects() {
        let candidate = fixtures::torrent_release("a", "Ran.1985").with_seeders(2);
        let verdict = MinimumSeedersSpecification
            .is_satisfied_by(&candidate, &criteria(Some(5)))
            .await
            .unwrap();
        assert_eq!(
            verdict,
            Verdict::reject("Not enough seeders: 2. Minimum seeders: 5")
        );
    }

    #[tokio::test]
    async fn test_enough_or_unknown_seeders_accepts() {
        let spec = MinimumSeedersSpecification;
        let seeded = fixtures::torrent_release("a", "Ran.1985").with_seeders(5);
        let unknown = fixtures::torrent_release("b", "Ran.1985");

        assert!(spec.is_satisfied_by(&seeded, &criteria(Some(5))).await.unwrap().is_accept());
        assert!(spec.is_satisfied_by(&unknown, &criteria(Some(5))).await.unwrap().is_accept());
        assert!(spec.is_satisfied_by(&seeded, &criteria(None)).await.unwrap().is_accept());
    }

    #[tokio::test]
    async fn test_indexer_minimum_overrides_profile() {
        let mut candidate = fixtures::torrent_release("a", "Ran.1985").with_seeders(3);
        candidate.indexer.as_mut().unwrap().settings = Some(IndexerSettings {
            minimum_seeders: Some(1),
            ..Default::default()
        });

        let verdict = MinimumSeedersSpecification
            .is_satisfied_by(&candidate, &criteria(Some(10)))
            .await
            .unwrap();
        assert!(verdict.is_accept());
    }
}
