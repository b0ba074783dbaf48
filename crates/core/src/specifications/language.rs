//! Language rule.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, Language, SearchCriteria};
use crate::specification::{fail_open, Specification, SpecificationError};

/// Rejects releases in none of the profile's languages.
///
/// `any` in the profile accepts every release. `original` stands for the
/// media's original language and is dropped when that language is unknown.
#[derive(Debug, Default)]
pub struct LanguageSpecification;

impl LanguageSpecification {
    pub const NAME: &'static str = "language";

    fn wanted_languages(criteria: &SearchCriteria) -> Option<BTreeSet<Language>> {
        if criteria.languages.iter().any(Language::is_any) {
            return None;
        }

        let wanted = criteria
            .languages
            .iter()
            .filter_map(|language| {
                if language.is_original() {
                    criteria.media.original_language.clone()
                } else {
                    Some(language.clone())
                }
            })
            .collect();
        Some(wanted)
    }
}

#[async_trait]
impl Specification for LanguageSpecification {
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
        let Some(wanted) = Self::wanted_languages(criteria) else {
            return Ok(Verdict::Accept);
        };

        Ok(fail_open::require_any(
            "languages",
            &wanted,
            candidate.languages.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::tag_set;
    use crate::testing::fixtures;

    fn criteria_with(languages: &[&str], original: Option<&str>) -> SearchCriteria {
        let mut criteria = SearchCriteria::new("Amelie");
        criteria.languages = tag_set(languages);
        criteria.media.original_language = original.map(Language::new);
        criteria
    }

    async fn accepts(candidate: &CandidateRelease, criteria: &SearchCriteria) -> bool {
        LanguageSpecification
            .is_satisfied_by(candidate, criteria)
            .await
            .unwrap()
            .is_accept()
    }

    #[tokio::test]
    async fn test_matching_language_accepts() {
        let candidate = fixtures::torrent_release("a", "Amelie").with_languages(&["french", "english"]);
        assert!(accepts(&candidate, &criteria_with(&["english"], None)).await);
    }

    #[tokio::test]
    async fn test_other_language_rejects() {
        let candidate = fixtures::torrent_release("a", "Amelie").with_languages(&["german"]);
        let verdict = LanguageSpecification
            .is_satisfied_by(&candidate, &criteria_with(&["english", "french"], None))
            .await
            .unwrap();
        assert_eq!(
            verdict,
            Verdict::reject(
                "None of the required languages [english, french] were found. Found languages: [german]"
            )
        );
    }

    #[tokio::test]
    async fn test_unknown_language_accepts() {
        let candidate = fixtures::torrent_release("a", "Amelie");
        assert!(accepts(&candidate, &criteria_with(&["english"], None)).await);
    }

    #[tokio::test]
    async fn test_any_accepts_everything() {
        let candidate = fixtures::torrent_release("a", "Amelie").with_languages(&["german"]);
        assert!(accepts(&candidate, &criteria_with(&["english", "any"], None)).await);
    }

    #[tokio::test]
    async fn test_original_resolves_to_media_language() {
        let french = fixtures::torrent_release("a", "Amelie").with_languages(&["french"]);
        let german = fixtures::torrent_release("b", "Amelie").with_languages(&["german"]);
        let criteria = criteria_with(&["original"], Some("French"));

        assert!(accepts(&french, &criteria).await);
        assert!(!accepts(&german, &criteria).await);
    }

    #[tokio::test]
    async fn test_original_without_known_language_accepts() {
        let candidate = fixtures::torrent_release("a", "Amelie").with_languages(&["german"]);
        assert!(accepts(&candidate, &criteria_with(&["original"], None)).await);
    }
}
