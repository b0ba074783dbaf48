use crate::release::{CandidateRelease, IndexerFlag, Language, Quality, SearchCriteria};

use super::types::EngineError;

/// Check the batch before anything is evaluated.
///
/// Candidates need a guid and a title, criteria need a media title, a
/// consistent size range and no blank tags.
pub fn validate_batch(
    candidates: &[CandidateRelease],
    criteria: &SearchCriteria,
) -> Result<(), EngineError> {
    if criteria.media.title.trim().is_empty() {
        return Err(EngineError::ContractViolation(
            "search criteria has no media title".to_string(),
        ));
    }

    if let (Some(min), Some(max)) = (criteria.size.min_bytes, criteria.size.max_bytes) {
        if min > max {
            return Err(EngineError::ContractViolation(format!(
                "size range is inverted: min {} > max {}",
                min, max
            )));
        }
    }

    let flags = &criteria.indexer_flags;
    let blank = if flags.required.iter().chain(&flags.forbidden).any(IndexerFlag::is_blank) {
        Some("indexer flag")
    } else if criteria.languages.iter().any(Language::is_blank) {
        Some("language")
    } else if criteria.qualities.iter().any(Quality::is_blank) {
        Some("quality")
    } else {
        None
    };
    if let Some(kind) = blank {
        return Err(EngineError::ContractViolation(format!(
            "search criteria contains a blank {}",
            kind
        )));
    }

    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.guid.trim().is_empty() {
            return Err(EngineError::ContractViolation(format!(
                "candidate #{} has no guid",
                index
            )));
        }
        if candidate.title.trim().is_empty() {
            return Err(EngineError::ContractViolation(format!(
                "candidate {} has no title",
                candidate.guid
            )));
        }
    }

    Ok(())
}
