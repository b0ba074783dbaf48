//! Structured inputs of the decision engine.
//!
//! Releases and criteria are produced by upstream collaborators (indexer
//! search, release-name parsing, profile storage) and are read-only while
//! the engine evaluates them.

mod candidate;
mod criteria;
mod tags;

pub use candidate::{CandidateRelease, IndexerInfo, IndexerSettings, Protocol};
pub use criteria::{FlagRequirements, MediaIdentity, SearchCriteria, SizeLimits};
pub use tags::{flags, format_set, tag_set, IndexerFlag, Language, Quality};
