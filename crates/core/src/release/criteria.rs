//! Search criteria: what a user wants a release to satisfy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::candidate::Protocol;
use super::tags::{
    deserialize_optional_tag, deserialize_tag_set, IndexerFlag, Language, Quality,
};

/// Identity of the wanted media item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaIdentity {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    /// Original language of the media, used to resolve `original` in the
    /// allowed language set.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_language: Option<Language>,
}

/// Allowed size range in bytes. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
}

impl SizeLimits {
    pub fn is_unbounded(&self) -> bool {
        self.min_bytes.is_none() && self.max_bytes.is_none()
    }
}

/// Indexer flag requirements of the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlagRequirements {
    /// At least one of these must be present.
    #[serde(
        default,
        deserialize_with = "deserialize_tag_set",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub required: BTreeSet<IndexerFlag>,
    /// None of these may be present.
    #[serde(
        default,
        deserialize_with = "deserialize_tag_set",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub forbidden: BTreeSet<IndexerFlag>,
}

/// The target constraints for one search cycle.
///
/// Every set-valued constraint uses "empty = no constraint".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCriteria {
    pub media: MediaIdentity,
    /// Allowed qualities.
    #[serde(
        default,
        deserialize_with = "deserialize_tag_set",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub qualities: BTreeSet<Quality>,
    /// Allowed languages. May contain `original` and `any`.
    #[serde(
        default,
        deserialize_with = "deserialize_tag_set",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub languages: BTreeSet<Language>,
    #[serde(default)]
    pub size: SizeLimits,
    #[serde(default)]
    pub indexer_flags: FlagRequirements,
    /// Allowed transports.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub protocols: BTreeSet<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_seeders: Option<u32>,
    /// Usenet retention of the download client, in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    /// Usenet releases younger than this are retried later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_age_minutes: Option<u32>,
    /// Terms the title must contain (any one). `/pattern/` terms are regexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_terms: Vec<String>,
    /// Terms the title must not contain. `/pattern/` terms are regexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_terms: Vec<String>,
    /// Reference clock for age-based rules, fixed for the whole cycle.
    #[serde(default = "Utc::now")]
    pub evaluated_at: DateTime<Utc>,
}

impl SearchCriteria {
    /// Criteria for `title` with no constraints.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            media: MediaIdentity {
                title: title.into(),
                ..Default::default()
            },
            qualities: BTreeSet::new(),
            languages: BTreeSet::new(),
            size: SizeLimits::default(),
            indexer_flags: FlagRequirements::default(),
            protocols: BTreeSet::new(),
            minimum_seeders: None,
            retention_days: None,
            minimum_age_minutes: None,
            required_terms: Vec::new(),
            ignored_terms: Vec::new(),
            evaluated_at: Utc::now(),
        }
    }
}
