//! Ordered, immutable collection of active specifications.

use std::sync::Arc;

use tracing::warn;

use crate::decision::RejectionType;

use super::capability::Capabilities;
use super::traits::{Specification, SpecificationPriority};

/// A specification with its declarations resolved at registration time.
#[derive(Clone)]
pub struct RegisteredSpecification {
    specification: Arc<dyn Specification>,
    name: String,
    rejection_type: RejectionType,
    priority: SpecificationPriority,
    requires: Capabilities,
}

impl RegisteredSpecification {
    fn new(specification: Arc<dyn Specification>) -> Self {
        Self {
            name: specification.name().to_string(),
            rejection_type: specification.rejection_type(),
            priority: specification.priority(),
            requires: specification.required_capabilities(),
            specification,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rejection_type(&self) -> RejectionType {
        self.rejection_type
    }

    pub fn priority(&self) -> SpecificationPriority {
        self.priority
    }

    pub fn requires(&self) -> &Capabilities {
        &self.requires
    }

    /// Whether this rule applies to a candidate exposing `capabilities`.
    pub fn applies_to(&self, capabilities: &Capabilities) -> bool {
        capabilities.satisfies(&self.requires)
    }

    pub fn specification(&self) -> &Arc<dyn Specification> {
        &self.specification
    }
}

impl std::fmt::Debug for RegisteredSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSpecification")
            .field("name", &self.name)
            .field("rejection_type", &self.rejection_type)
            .field("priority", &self.priority)
            .field("requires", &self.requires)
            .finish()
    }
}

/// Specifications in evaluation order.
///
/// Ordered by priority tier, then by registration order. There is no way to
/// add a specification after `build`, so the order is fixed for a cycle.
#[derive(Debug, Clone, Default)]
pub struct SpecificationRegistry {
    entries: Vec<RegisteredSpecification>,
}

impl SpecificationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSpecification> {
        self.entries.iter()
    }

    /// Names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    /// Specifications that apply to a candidate exposing `capabilities`.
    pub fn applicable_to<'a>(
        &'a self,
        capabilities: &'a Capabilities,
    ) -> impl Iterator<Item = &'a RegisteredSpecification> + 'a {
        self.entries.iter().filter(move |e| e.applies_to(capabilities))
    }
}

/// Collects specifications at composition time.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<RegisteredSpecification>,
}

impl RegistryBuilder {
    pub fn register(self, specification: impl Specification + 'static) -> Self {
        self.register_arc(Arc::new(specification))
    }

    pub fn register_arc(mut self, specification: Arc<dyn Specification>) -> Self {
        let entry = RegisteredSpecification::new(specification);
        if self.entries.iter().any(|e| e.name == entry.name) {
            warn!(
                specification = %entry.name,
                "Specification registered more than once"
            );
        }
        self.entries.push(entry);
        self
    }

    pub fn build(mut self) -> SpecificationRegistry {
        // `sort_by_key` is stable: registration order is kept within a tier.
        self.entries.sort_by_key(|e| e.priority);
        SpecificationRegistry {
            entries: self.entries,
        }
    }
}
