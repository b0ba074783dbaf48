//! Indexer flag rules.
//!
//! Private trackers tag releases with flags such as freeleech or internal.
//! A profile can require that at least one of a set of flags is present,
//! and can forbid flags outright.

use async_trait::async_trait;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{
    fail_open, Capabilities, Capability, Specification, SpecificationError,
};

/// Rejects torrents carrying none of the required indexer flags.
///
/// The indexer's own required flags, when it declares any, override the
/// profile's. Only applies to torrents.
#[derive(Debug, Default)]
pub struct RequiredIndexerFlagsSpecification;

impl RequiredIndexerFlagsSpecification {
    pub const NAME: &'static str = "required_indexer_flags";
}

#[async_trait]
impl Specification for RequiredIndexerFlagsSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities::of(&[Capability::Torrent])
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        let required = candidate
            .indexer_settings()
            .map(|s| &s.required_flags)
            .filter(|flags| !flags.is_empty())
            .unwrap_or(&criteria.indexer_flags.required);

        Ok(fail_open::require_any(
            "indexer flags",
            required,
            candidate.indexer_flags.as_ref(),
        ))
    }
}

/// Rejects releases carrying any forbidden indexer flag.
#[derive(Debug, Default)]
pub struct ForbiddenIndexerFlagsSpecification;

impl ForbiddenIndexerFlagsSpecification {
    pub const NAME: &'static str = "forbidden_indexer_flags";
}

#[async_trait]
impl Specification for ForbiddenIndexerFlagsSpecification {
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
        Ok(fail_open::forbid_all(
            "indexer flags",
            &criteria.indexer_flags.forbidden,
            candidate.indexer_flags.as_ref(),
        ))
    }
}
