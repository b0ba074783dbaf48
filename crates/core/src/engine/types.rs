use thiserror::Error;

/// Errors returned by the engine itself.
///
/// Specification faults are never reported here; they become temporary
/// rejections on the affected candidate.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller handed over input that breaks the engine's contract.
    /// Nothing was evaluated.
    #[error("Contract violation: {0}")]
    ContractViolation(String),
}
