//! Capabilities a candidate exposes and a specification requires.
//!
//! A specification that only makes sense for torrents declares
//! `Capability::Torrent` once; the driver compares capability sets instead
//! of each rule inspecting the candidate's shape on every call.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::release::{CandidateRelease, Protocol};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Fetched over BitTorrent.
    Torrent,
    /// Fetched from usenet.
    Usenet,
    /// The originating indexer is known.
    IndexerIdentity,
    /// The originating indexer's settings are loaded.
    IndexerSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn of(capabilities: &[Capability]) -> Self {
        Self(capabilities.iter().copied().collect())
    }

    /// Capabilities exposed by a candidate.
    pub fn of_candidate(candidate: &CandidateRelease) -> Self {
        let mut set = BTreeSet::new();
        match candidate.protocol {
            Protocol::Torrent => {
                set.insert(Capability::Torrent);
            }
            Protocol::Usenet => {
                set.insert(Capability::Usenet);
            }
            Protocol::Unknown => {}
        }
        if let Some(indexer) = &candidate.indexer {
            set.insert(Capability::IndexerIdentity);
            if indexer.settings.is_some() {
                set.insert(Capability::IndexerSettings);
            }
        }
        Self(set)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// True if every capability in `required` is exposed.
    pub fn satisfies(&self, required: &Capabilities) -> bool {
        required.0.is_subset(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|c| format!("{:?}", c)).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{IndexerInfo, IndexerSettings};

    #[test]
    fn test_unknown_candidate_exposes_nothing() {
        let candidate = CandidateRelease::new("a", "title");
        assert!(Capabilities::of_candidate(&candidate).is_empty());
    }

    #[test]
    fn test_torrent_with_indexer_settings() {
        let mut candidate = CandidateRelease::new("a", "title");
        candidate.protocol = Protocol::Torrent;
        candidate.indexer = Some(IndexerInfo {
            name: "tracker".to_string(),
            settings: Some(IndexerSettings::default()),
        });

        let caps = Capabilities::of_candidate(&candidate);
        assert!(caps.contains(Capability::Torrent));
        assert!(caps.contains(Capability::IndexerIdentity));
        assert!(caps.contains(Capability::IndexerSettings));
        assert!(!caps.contains(Capability::Usenet));
    }

    #[test]
    fn test_satisfies() {
        let exposed = Capabilities::of(&[Capability::Torrent, Capability::IndexerIdentity]);
        assert!(exposed.satisfies(&Capabilities::none()));
        assert!(exposed.satisfies(&Capabilities::of(&[Capability::Torrent])));
        assert!(!exposed.satisfies(&Capabilities::of(&[Capability::Usenet])));
    }

    #[test]
    fn test_display() {
        let caps = Capabilities::of(&[Capability::Usenet, Capability::Torrent]);
        assert_eq!(caps.to_string(), "{Torrent, Usenet}");
    }
}
