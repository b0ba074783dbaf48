//! Token bucket grab quotas, one bucket per indexer.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use super::{GrabQuota, QuotaError, QuotaStatus};
use crate::config::GrabLimitsConfig;

const HOUR: Duration = Duration::from_secs(3600);

/// Token bucket for a single indexer.
///
/// Tokens are added at a constant rate and consumed when a release is
/// grabbed. The bucket starts full.
#[derive(Debug)]
pub struct TokenBucket {
    /// Max tokens (= grabs per period).
    capacity: f64,
    /// Current available tokens.
    tokens: f64,
    /// Tokens added per second.
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Bucket allowing `grabs` per `period`.
    pub fn new(grabs: u32, period: Duration) -> Self {
        let capacity = grabs as f64;
        Self {
            capacity,
            tokens: capacity,
            refill_rate: capacity / period.as_secs_f64(),
            last_refill: Instant::now(),
        }
    }

    pub fn per_hour(grabs: u32) -> Self {
        Self::new(grabs, HOUR)
    }

    /// Status without consuming a token.
    pub fn peek(&mut self) -> QuotaStatus {
        self.refill();
        if self.tokens >= 1.0 {
            QuotaStatus::Available {
                remaining: self.tokens.floor() as u32,
            }
        } else {
            QuotaStatus::Exhausted {
                limit: self.capacity as u32,
                retry_after_ms: self.wait_for_token().as_millis() as u64,
            }
        }
    }

    /// Consume a token, or return how long until one is available.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(self.wait_for_token())
        }
    }

    /// Change the limit, keeping current tokens clamped to the new capacity.
    pub fn set_limit(&mut self, grabs: u32, period: Duration) {
        self.capacity = grabs as f64;
        self.refill_rate = self.capacity / period.as_secs_f64();
        self.tokens = self.tokens.min(self.capacity);
    }

    fn wait_for_token(&self) -> Duration {
        if self.refill_rate <= 0.0 {
            return HOUR;
        }
        Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

/// Hourly grab limits per indexer.
///
/// Indexers without an explicit limit use `default_per_hour`; with no
/// default they are unlimited. Thread-safe and async-compatible.
pub struct TokenBucketQuota {
    limiters: RwLock<HashMap<String, TokenBucket>>,
    default_per_hour: Option<u32>,
}

impl TokenBucketQuota {
    pub fn new(default_per_hour: Option<u32>) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            default_per_hour,
        }
    }

    pub fn from_config(config: &GrabLimitsConfig) -> Self {
        let default_per_hour = match config.default_per_hour {
            0 => None,
            n => Some(n),
        };
        let limiters = config
            .indexers
            .iter()
            .map(|i| (i.name.clone(), TokenBucket::per_hour(i.per_hour)))
            .collect();
        Self {
            limiters: RwLock::new(limiters),
            default_per_hour,
        }
    }

    /// Add or update an indexer's limit.
    pub async fn set_limit(&self, indexer: &str, per_hour: u32) {
        let mut limiters = self.limiters.write().await;
        match limiters.get_mut(indexer) {
            Some(bucket) => bucket.set_limit(per_hour, HOUR),
            None => {
                limiters.insert(indexer.to_string(), TokenBucket::per_hour(per_hour));
            }
        }
    }

    /// Record a grab against `indexer`'s quota.
    ///
    /// Called by the download collaborator after it pushed a release; the
    /// decision engine only ever peeks.
    pub async fn record_grab(&self, indexer: &str) -> Result<(), QuotaError> {
        let mut limiters = self.limiters.write().await;
        if !limiters.contains_key(indexer) {
            match self.default_per_hour {
                Some(per_hour) => {
                    limiters.insert(indexer.to_string(), TokenBucket::per_hour(per_hour));
                }
                None => return Ok(()),
            }
        }
        let Some(bucket) = limiters.get_mut(indexer) else {
            return Ok(());
        };

        bucket.try_acquire().map_err(|wait| QuotaError::LimitReached {
            indexer: indexer.to_string(),
            retry_after_ms: wait.as_millis() as u64,
        })
    }

    pub async fn has_indexer(&self, indexer: &str) -> bool {
        self.limiters.read().await.contains_key(indexer)
    }
}

#[async_trait]
impl GrabQuota for TokenBucketQuota {
    fn name(&self) -> &str {
        "token_bucket"
    }

    async fn check(&self, indexer: &str) -> Result<QuotaStatus, QuotaError> {
        let mut limiters = self.limiters.write().await;
        match limiters.get_mut(indexer) {
            Some(bucket) => Ok(bucket.peek()),
            None => Ok(match self.default_per_hour {
                Some(per_hour) => QuotaStatus::Available {
                    remaining: per_hour,
                },
                None => QuotaStatus::Unlimited,
            }),
        }
    }
}
