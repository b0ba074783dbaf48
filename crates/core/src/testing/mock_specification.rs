//! Mock specification for testing.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{
    Capabilities, Specification, SpecificationError, SpecificationPriority,
};

use super::lock;

#[derive(Debug, Clone)]
enum Behavior {
    Accept,
    Reject(String),
    Fail(String),
    Panic,
}

/// Mock implementation of the Specification trait.
///
/// Provides controllable behavior for testing:
/// - Accept, reject, fail or panic on every call
/// - Restrict that behavior to some candidates (others are accepted)
/// - Simulate slow rules with a delay
/// - Count invocations for short-circuit assertions
///
/// Clones share their counters, so a test can keep one clone and register
/// the other.
///
/// # Example
///
/// ```rust,ignore
/// use arbiter_core::testing::MockSpecification;
///
/// let flags = MockSpecification::rejecting("flags", "no freeleech");
/// let registry = SpecificationRegistry::builder().register(flags.clone()).build();
///
/// // ... evaluate ...
/// assert_eq!(flags.invocations(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockSpecification {
    name: String,
    behavior: Behavior,
    rejection_type: RejectionType,
    priority: SpecificationPriority,
    capabilities: Capabilities,
    delay: Option<Duration>,
    only_guids: Option<BTreeSet<String>>,
    invocations: Arc<AtomicUsize>,
    invoked: Arc<Mutex<Vec<String>>>,
}

impl MockSpecification {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            rejection_type: RejectionType::Permanent,
            priority: SpecificationPriority::Local,
            capabilities: Capabilities::none(),
            delay: None,
            only_guids: None,
            invocations: Arc::new(AtomicUsize::new(0)),
            invoked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A specification that accepts everything.
    pub fn accepting(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Accept)
    }

    /// A specification that rejects with `message`.
    pub fn rejecting(name: &str, message: &str) -> Self {
        Self::with_behavior(name, Behavior::Reject(message.to_string()))
    }

    /// A specification that returns an error instead of a verdict.
    pub fn failing(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Fail(format!("{} is broken", name)))
    }

    /// A specification that panics.
    pub fn panicking(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Panic)
    }

    pub fn with_rejection_type(mut self, rejection_type: RejectionType) -> Self {
        self.rejection_type = rejection_type;
        self
    }

    pub fn with_priority(mut self, priority: SpecificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Apply the configured behavior only to these candidates; accept the rest.
    pub fn only_for(mut self, guids: &[&str]) -> Self {
        self.only_guids = Some(guids.iter().map(|g| g.to_string()).collect());
        self
    }

    /// Number of calls so far.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Guids of the candidates this specification was called with, in call order.
    pub fn invoked_guids(&self) -> Vec<String> {
        lock(&self.invoked).clone()
    }
}

#[async_trait]
impl Specification for MockSpecification {
    fn name(&self) -> &str {
        &self.name
    }

    fn rejection_type(&self) -> RejectionType {
        self.rejection_type
    }

    fn priority(&self) -> SpecificationPriority {
        self.priority
    }

    fn required_capabilities(&self) -> Capabilities {
        self.capabilities.clone()
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        _criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        lock(&self.invoked).push(candidate.guid.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(guids) = &self.only_guids {
            if !guids.contains(&candidate.guid) {
                return Ok(Verdict::Accept);
            }
        }

        match &self.behavior {
            Behavior::Accept => Ok(Verdict::Accept),
            Behavior::Reject(message) => Ok(Verdict::reject(message.clone())),
            Behavior::Fail(message) => Err(SpecificationError::Internal(message.clone())),
            Behavior::Panic => panic!("{} panicked", self.name),
        }
    }
}
