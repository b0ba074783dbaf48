//! Batch file: one search cycle worth of input.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use arbiter_core::{CandidateRelease, SearchCriteria};

/// Criteria plus the candidates found for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationBatch {
    pub criteria: SearchCriteria,
    #[serde(default)]
    pub candidates: Vec<CandidateRelease>,
}

impl EvaluationBatch {
    /// Read a batch from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse batch file {:?}", path))
    }
}
