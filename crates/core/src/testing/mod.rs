//! Testing utilities and mock implementations.
//!
//! This module provides mocks for the engine's extension points so rules,
//! ordering and fault handling can be tested without real collaborators.
//!
//! # Example
//!
//! ```rust,ignore
//! use arbiter_core::testing::{fixtures, MockSpecification};
//!
//! let spec = MockSpecification::rejecting("flags", "no freeleech");
//! let candidate = fixtures::torrent_release("abc", "Movie.2020.1080p");
//! ```

#[cfg(test)]
pub(crate) mod events;
mod mock_grab_quota;
mod mock_specification;

pub use mock_grab_quota::MockGrabQuota;
pub use mock_specification::MockSpecification;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mock's state, ignoring poisoning from panicking tests.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::release::{CandidateRelease, Protocol, SearchCriteria};

    /// Indexer name used by every fixture release.
    pub const INDEXER: &str = "mock-indexer";

    /// A torrent release from `INDEXER` with nothing else known.
    pub fn torrent_release(guid: &str, title: &str) -> CandidateRelease {
        CandidateRelease::new(guid, title)
            .with_protocol(Protocol::Torrent)
            .with_indexer(INDEXER)
    }

    /// A usenet release from `INDEXER` with nothing else known.
    pub fn usenet_release(guid: &str, title: &str) -> CandidateRelease {
        CandidateRelease::new(guid, title)
            .with_protocol(Protocol::Usenet)
            .with_indexer(INDEXER)
    }

    /// `count` torrent releases with guids `c0`, `c1`, ...
    pub fn torrent_batch(count: usize) -> Vec<CandidateRelease> {
        (0..count)
            .map(|i| torrent_release(&format!("c{}", i), &format!("Movie.2020.Part{}", i)))
            .collect()
    }

    /// Unconstrained criteria for `title`.
    pub fn criteria(title: &str) -> SearchCriteria {
        SearchCriteria::new(title)
    }
}
