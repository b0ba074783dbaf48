//! Prometheus metrics for the decision engine.
//!
//! This module provides metrics for:
//! - Decisions (accepted, permanently or temporarily rejected)
//! - Rejections per specification
//! - Specification faults (errors, panics, timeouts)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

// =============================================================================
// Decisions
// =============================================================================

/// Decisions by result.
pub static DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("arbiter_decisions_total", "Total candidate decisions"),
        &["result"], // "accepted", "rejected_permanent", "rejected_temporary"
    )
    .unwrap()
});

/// Rejections by specification and severity.
pub static REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("arbiter_rejections_total", "Total rejection reasons"),
        &["specification", "severity"],
    )
    .unwrap()
});

/// Candidates cancelled before their evaluation completed.
pub static CANCELLED_CANDIDATES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "arbiter_cancelled_candidates_total",
        "Candidates whose evaluation was cancelled",
    )
    .unwrap()
});

// =============================================================================
// Specifications
// =============================================================================

/// Specification calls that did not produce a verdict.
pub static SPECIFICATION_FAULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "arbiter_specification_faults_total",
            "Specification calls that failed, panicked or timed out",
        ),
        &["specification", "kind"], // "error", "panic", "timeout"
    )
    .unwrap()
});

/// Time to evaluate one candidate against the whole registry.
pub static EVALUATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "arbiter_evaluation_duration_seconds",
            "Duration of a single candidate evaluation",
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(DECISIONS_TOTAL.clone()),
        Box::new(REJECTIONS_TOTAL.clone()),
        Box::new(CANCELLED_CANDIDATES.clone()),
        Box::new(SPECIFICATION_FAULTS.clone()),
        Box::new(EVALUATION_DURATION.clone()),
    ]
}

/// Render all metrics in the Prometheus text format.
pub fn encode_text() -> Result<String, prometheus::Error> {
    let registry = Registry::new();
    for metric in all_metrics() {
        registry.register(metric)?;
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
