//! Mock grab quota for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::quota::{GrabQuota, QuotaError, QuotaStatus};

use super::lock;

/// Mock implementation of the GrabQuota trait.
///
/// Indexers without a configured status are unlimited. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockGrabQuota {
    statuses: Arc<Mutex<HashMap<String, QuotaStatus>>>,
    failure: Arc<Mutex<Option<String>>>,
    checked: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockGrabQuota {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before answering each check.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_status(&self, indexer: &str, status: QuotaStatus) {
        lock(&self.statuses).insert(indexer.to_string(), status);
    }

    /// Make every following check fail as unavailable.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    /// Indexers checked so far, in call order.
    pub fn checked(&self) -> Vec<String> {
        lock(&self.checked).clone()
    }
}

#[async_trait]
impl GrabQuota for MockGrabQuota {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check(&self, indexer: &str) -> Result<QuotaStatus, QuotaError> {
        lock(&self.checked).push(indexer.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = lock(&self.failure).clone() {
            return Err(QuotaError::Unavailable(message));
        }

        Ok(lock(&self.statuses)
            .get(indexer)
            .copied()
            .unwrap_or(QuotaStatus::Unlimited))
    }
}
