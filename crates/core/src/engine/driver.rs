//! Decision engine driver.
//!
//! Evaluates every candidate against the registry:
//! - Candidates: concurrent, bounded by `max_parallel_candidates`, output in input order
//! - Specifications: sequential per candidate, in registry order
//! - Faults: errors, panics and timeouts become one temporary rejection each

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{FutureExt, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::decision::{Decision, RejectionReason, ReleaseDecision, Verdict};
use crate::metrics;
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{Capabilities, RegisteredSpecification, SpecificationRegistry};

use super::config::EngineConfig;
use super::types::EngineError;
use super::validate::validate_batch;

/// Name reported on rejections the engine adds itself.
pub const ENGINE_REJECTION: &str = "engine";

/// Message of the rejection appended to cancelled candidates.
pub const CANCELLED_MESSAGE: &str = "Evaluation cancelled";

/// Runs candidates through the specification registry.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    registry: Arc<SpecificationRegistry>,
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(registry: Arc<SpecificationRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &SpecificationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide on every candidate of a search cycle.
    ///
    /// Returns one decision per candidate, in input order. When `cancel`
    /// fires, candidates not yet finished are reported with a temporary
    /// cancellation rejection instead of being dropped.
    pub async fn get_decisions(
        &self,
        candidates: Vec<CandidateRelease>,
        criteria: &SearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReleaseDecision>, EngineError> {
        validate_batch(&candidates, criteria)?;

        info!(
            candidates = candidates.len(),
            specifications = self.registry.len(),
            short_circuit = self.config.short_circuit,
            "Evaluating candidates"
        );

        let criteria = Arc::new(criteria.clone());
        let max_parallel = self.config.max_parallel_candidates.max(1);

        let decisions: Vec<ReleaseDecision> = futures::stream::iter(candidates)
            .map(|candidate| {
                let engine = self.clone();
                let criteria = Arc::clone(&criteria);
                let cancel = cancel.clone();
                async move { engine.decide_in_task(candidate, criteria, cancel).await }
            })
            .buffered(max_parallel)
            .collect()
            .await;

        let accepted = decisions.iter().filter(|d| d.is_accepted()).count();
        info!(
            candidates = decisions.len(),
            accepted = accepted,
            rejected = decisions.len() - accepted,
            "Evaluation complete"
        );

        Ok(decisions)
    }

    /// Decide on a single candidate, without cancellation.
    pub async fn evaluate(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Decision {
        self.evaluate_with_cancel(candidate, criteria, &CancellationToken::new())
            .await
    }

    /// Run one specification against a candidate.
    ///
    /// The verdict's severity comes from the specification's declared
    /// rejection type. A call that errors, panics or exceeds
    /// `specification_timeout_ms` yields exactly one temporary rejection.
    pub async fn evaluate_specification(
        &self,
        specification: &RegisteredSpecification,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Decision {
        self.run_specification(specification, candidate, criteria)
            .await
            .0
    }

    /// Like `evaluate_specification`, also returning the fault kind when the
    /// call did not produce a verdict.
    async fn run_specification(
        &self,
        specification: &RegisteredSpecification,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> (Decision, Option<&'static str>) {
        let name = specification.name();
        let timeout = Duration::from_millis(self.config.specification_timeout_ms);
        let call = AssertUnwindSafe(
            specification
                .specification()
                .is_satisfied_by(candidate, criteria),
        )
        .catch_unwind();

        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(Ok(Verdict::Accept))) => (Decision::accept(), None),
            Ok(Ok(Ok(Verdict::Reject(message)))) => (
                Decision::reject(RejectionReason::new(
                    name,
                    specification.rejection_type(),
                    message,
                )),
                None,
            ),
            Ok(Ok(Err(e))) => fault(name, "error", format!("Specification failed: {}", e)),
            Ok(Err(panic)) => fault(
                name,
                "panic",
                format!("Specification panicked: {}", panic_message(panic.as_ref())),
            ),
            Err(_) => fault(
                name,
                "timeout",
                format!("Specification timed out after {}ms", timeout.as_millis()),
            ),
        }
    }

    /// Spawn the evaluation of one candidate and pair it with its decision.
    async fn decide_in_task(
        self,
        candidate: CandidateRelease,
        criteria: Arc<SearchCriteria>,
        cancel: CancellationToken,
    ) -> ReleaseDecision {
        if cancel.is_cancelled() {
            let reason = cancelled(&candidate);
            return finish(candidate, Decision::reject(reason), None);
        }

        let candidate = Arc::new(candidate);
        let started = Instant::now();
        let handle = tokio::spawn({
            let candidate = Arc::clone(&candidate);
            async move {
                self.evaluate_with_cancel(&candidate, &criteria, &cancel)
                    .await
            }
        });

        let decision = match handle.await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    candidate = %candidate.guid,
                    error = %e,
                    "Candidate evaluation task failed"
                );
                Decision::reject(RejectionReason::temporary(
                    ENGINE_REJECTION,
                    format!("Evaluation task failed: {}", e),
                ))
            }
        };

        let candidate = Arc::try_unwrap(candidate).unwrap_or_else(|shared| (*shared).clone());
        finish(candidate, decision, Some(started))
    }

    async fn evaluate_with_cancel(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
        cancel: &CancellationToken,
    ) -> Decision {
        let capabilities = Capabilities::of_candidate(candidate);
        let mut rejections = Vec::new();

        for specification in self.registry.applicable_to(&capabilities) {
            let evaluation = self.run_specification(specification, candidate, criteria);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                evaluated = evaluation => Some(evaluated),
            };

            let Some((decision, fault)) = outcome else {
                rejections.push(cancelled(candidate));
                break;
            };

            let stop = self.config.short_circuit && decision.is_permanently_rejected();
            for reason in decision.into_rejections() {
                log_rejection(candidate, &reason, fault);
                rejections.push(reason);
            }

            if stop {
                debug!(
                    candidate = %candidate.guid,
                    specification = specification.name(),
                    "Permanent rejection, skipping remaining specifications"
                );
                break;
            }
        }

        Decision::from_rejections(rejections)
    }
}

/// Rejection for a candidate whose evaluation did not complete.
fn cancelled(candidate: &CandidateRelease) -> RejectionReason {
    let reason = RejectionReason::temporary(ENGINE_REJECTION, CANCELLED_MESSAGE);
    log_rejection(candidate, &reason, None);
    metrics::CANCELLED_CANDIDATES.inc();
    reason
}

fn fault(
    specification: &str,
    kind: &'static str,
    message: String,
) -> (Decision, Option<&'static str>) {
    metrics::SPECIFICATION_FAULTS
        .with_label_values(&[specification, kind])
        .inc();
    (
        Decision::reject(RejectionReason::temporary(specification, message)),
        Some(kind),
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One event per rejection. Faults are raised to `warn`.
fn log_rejection(candidate: &CandidateRelease, reason: &RejectionReason, fault: Option<&str>) {
    match fault {
        Some(kind) => warn!(
            specification = %reason.specification,
            severity = %reason.severity,
            message = %reason.message,
            fault = kind,
            candidate = %candidate.guid,
            title = %candidate.title,
            "Specification fault"
        ),
        None => debug!(
            specification = %reason.specification,
            severity = %reason.severity,
            message = %reason.message,
            candidate = %candidate.guid,
            title = %candidate.title,
            "Release rejected"
        ),
    }
    let severity = reason.severity.to_string();
    metrics::REJECTIONS_TOTAL
        .with_label_values(&[reason.specification.as_str(), severity.as_str()])
        .inc();
}

fn finish(
    candidate: CandidateRelease,
    decision: Decision,
    started: Option<Instant>,
) -> ReleaseDecision {
    let result = if decision.accepted() {
        "accepted"
    } else if decision.is_permanently_rejected() {
        "rejected_permanent"
    } else {
        "rejected_temporary"
    };

    metrics::DECISIONS_TOTAL.with_label_values(&[result]).inc();
    if let Some(started) = started {
        metrics::EVALUATION_DURATION
            .with_label_values(&[result])
            .observe(started.elapsed().as_secs_f64());
    }

    ReleaseDecision {
        candidate,
        decision,
    }
}
