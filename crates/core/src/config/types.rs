use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub specifications: SpecificationsConfig,
    /// Per-indexer grab limits. When absent the grab limit rule is not registered.
    #[serde(default)]
    pub grab_limits: Option<GrabLimitsConfig>,
}

/// Which built-in specifications are active.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpecificationsConfig {
    /// Names of built-in specifications to leave out of the registry.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl SpecificationsConfig {
    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.iter().any(|d| d == name)
    }
}

/// Grab limit configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrabLimitsConfig {
    /// Limit for indexers not listed below (0 = unlimited).
    #[serde(default)]
    pub default_per_hour: u32,
    /// How long the quota check may take before the release is retried later.
    #[serde(default = "default_quota_timeout")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub indexers: Vec<IndexerGrabLimit>,
}

impl Default for GrabLimitsConfig {
    fn default() -> Self {
        Self {
            default_per_hour: 0,
            timeout_ms: default_quota_timeout(),
            indexers: Vec::new(),
        }
    }
}

fn default_quota_timeout() -> u64 {
    2000
}

/// Hourly grab limit of one indexer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerGrabLimit {
    pub name: String,
    pub per_hour: u32,
}
