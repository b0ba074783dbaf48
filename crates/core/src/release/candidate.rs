//! Parsed candidate releases as handed over by the search collaborator.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::tags::{
    deserialize_optional_tag, deserialize_optional_tag_set, deserialize_tag_set, tag_set,
    IndexerFlag, Language, Quality,
};

/// Transport a release is fetched with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Torrent,
    Usenet,
    #[default]
    Unknown,
}

impl Protocol {
    /// `None` for [`Protocol::Unknown`].
    pub fn known(self) -> Option<Self> {
        (self != Protocol::Unknown).then_some(self)
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Protocol::Torrent => "torrent",
            Protocol::Usenet => "usenet",
            Protocol::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Indexer-level settings that override the search profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexerSettings {
    /// Flags this indexer requires (any one of them).
    /// Empty means the indexer does not override the profile.
    #[serde(
        default,
        deserialize_with = "deserialize_tag_set",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub required_flags: BTreeSet<IndexerFlag>,
    /// Minimum seeders for releases from this indexer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_seeders: Option<u32>,
}

/// The indexer a release was found on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexerInfo {
    /// Indexer name, used as identity for quotas and logs.
    pub name: String,
    /// Settings configured for this indexer, if the collaborator loaded them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<IndexerSettings>,
}

/// A discovered release, already parsed into structured fields.
///
/// `None` on any optional field means the value is unknown. Specifications
/// treat unknown values as "cannot judge" and accept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRelease {
    /// Stable identity of the release on its indexer.
    pub guid: String,
    /// Release title as published.
    pub title: String,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexer: Option<IndexerInfo>,
    /// Flags reported by the indexer. `Some(empty)` means "reported none".
    #[serde(
        default,
        deserialize_with = "deserialize_optional_tag_set",
        skip_serializing_if = "Option::is_none"
    )]
    pub indexer_flags: Option<BTreeSet<IndexerFlag>>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_tag_set",
        skip_serializing_if = "Option::is_none"
    )]
    pub languages: Option<BTreeSet<Language>>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeders: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leechers: Option<u32>,
}

impl CandidateRelease {
    /// Create a release with only identity fields known.
    pub fn new(guid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            title: title.into(),
            size_bytes: None,
            protocol: Protocol::Unknown,
            indexer: None,
            indexer_flags: None,
            languages: None,
            quality: None,
            publish_date: None,
            seeders: None,
            leechers: None,
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_indexer(mut self, name: impl Into<String>) -> Self {
        self.indexer = Some(IndexerInfo {
            name: name.into(),
            settings: None,
        });
        self
    }

    /// Set the reported indexer flags. An empty slice means "reported none".
    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        self.indexer_flags = Some(tag_set(flags));
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = Some(tag_set(languages));
        self
    }

    pub fn with_quality(mut self, quality: &str) -> Self {
        self.quality = Some(Quality::new(quality));
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub fn with_seeders(mut self, seeders: u32) -> Self {
        self.seeders = Some(seeders);
        self
    }

    pub fn published_at(mut self, date: DateTime<Utc>) -> Self {
        self.publish_date = Some(date);
        self
    }

    /// Name of the indexer this release came from, if known.
    pub fn indexer_name(&self) -> Option<&str> {
        self.indexer.as_ref().map(|i| i.name.as_str())
    }

    /// Indexer settings, if the indexer and its settings are known.
    pub fn indexer_settings(&self) -> Option<&IndexerSettings> {
        self.indexer.as_ref().and_then(|i| i.settings.as_ref())
    }

    /// Age of the release at `now`. Publish dates in the future count as zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.publish_date
            .map(|published| (now - published).max(Duration::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_deserialization_leaves_fields_unknown() {
        let json = r#"{"guid": "abc", "title": "Movie.2020.1080p"}"#;
        let release: CandidateRelease = serde_json::from_str(json).unwrap();

        assert_eq!(release.guid, "abc");
        assert_eq!(release.protocol, Protocol::Unknown);
        assert!(release.indexer_flags.is_none());
        assert!(release.languages.is_none());
        assert!(release.indexer_name().is_none());
    }

    #[test]
    fn test_empty_flags_are_distinct_from_unknown() {
        let json = r#"{"guid": "abc", "title": "t", "indexer_flags": []}"#;
        let release: CandidateRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.indexer_flags, Some(BTreeSet::new()));
    }

    #[test]
    fn test_blank_tags_are_dropped() {
        let json = r#"{
            "guid": "abc", "title": "t", "quality": "  ",
            "indexer_flags": [" ", "Internal"], "languages": [""],
            "indexer": {"name": "x", "settings": {"required_flags": [""]}}
        }"#;
        let release: CandidateRelease = serde_json::from_str(json).unwrap();

        assert!(release.quality.is_none());
        assert_eq!(release.indexer_flags, Some(tag_set(&["internal"])));
        assert_eq!(release.languages, Some(BTreeSet::new()));
        let settings = release.indexer.unwrap().settings.unwrap();
        assert!(settings.required_flags.is_empty());
    }

    #[test]
    fn test_age_at() {
        let now = Utc::now();
        let mut release = CandidateRelease::new("a", "t");
        assert!(release.age_at(now).is_none());

        release.publish_date = Some(now - Duration::hours(3));
        assert_eq!(release.age_at(now).unwrap().num_hours(), 3);

        release.publish_date = Some(now + Duration::hours(1));
        assert_eq!(release.age_at(now).unwrap(), Duration::zero());
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!(Protocol::Torrent.to_string(), "torrent");
        assert_eq!(
            serde_json::to_string(&Protocol::Usenet).unwrap(),
            "\"usenet\""
        );
    }
}
