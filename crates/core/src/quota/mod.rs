//! Grab quota collaborator.
//!
//! Indexers often cap how many releases may be grabbed per hour. The engine
//! asks a `GrabQuota` whether an indexer still has room; the quota owns its
//! own synchronization and is shared between the engine and whatever
//! records grabs.

mod token_bucket;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use token_bucket::{TokenBucket, TokenBucketQuota};

/// Remaining grab capacity of an indexer.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum QuotaStatus {
    /// No limit configured.
    Unlimited,
    Available { remaining: u32 },
    Exhausted { limit: u32, retry_after_ms: u64 },
}

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Grab limit reached for indexer {indexer}, retry in {retry_after_ms}ms")]
    LimitReached {
        indexer: String,
        retry_after_ms: u64,
    },

    #[error("Quota service unavailable: {0}")]
    Unavailable(String),
}

/// Source of per-indexer grab quotas.
#[async_trait]
pub trait GrabQuota: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Current status for `indexer`, without consuming anything.
    async fn check(&self, indexer: &str) -> Result<QuotaStatus, QuotaError>;
}
