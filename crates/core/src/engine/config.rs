//! Decision engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Stop evaluating a candidate after its first permanent rejection.
    /// Temporary rejections never stop evaluation.
    #[serde(default = "default_short_circuit")]
    pub short_circuit: bool,

    /// Upper bound for a single specification call (milliseconds).
    /// A call that exceeds it becomes a temporary rejection.
    #[serde(default = "default_specification_timeout")]
    pub specification_timeout_ms: u64,

    /// How many candidates are evaluated concurrently.
    #[serde(default = "default_max_parallel")]
    pub max_parallel_candidates: usize,
}

fn default_short_circuit() -> bool {
    true
}

fn default_specification_timeout() -> u64 {
    5000 // 5 seconds
}

fn default_max_parallel() -> usize {
    8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_circuit: default_short_circuit(),
            specification_timeout_ms: default_specification_timeout(),
            max_parallel_candidates: default_max_parallel(),
        }
    }
}
