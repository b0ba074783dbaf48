//! Built-in specifications.

mod age;
mod grab_limit;
mod indexer_flags;
mod language;
mod protocol;
mod quality;
mod restrictions;
mod seeders;
mod size;

pub use age::{MinimumAgeSpecification, RetentionSpecification};
pub use grab_limit::IndexerGrabLimitSpecification;
pub use indexer_flags::{ForbiddenIndexerFlagsSpecification, RequiredIndexerFlagsSpecification};
pub use language::LanguageSpecification;
pub use protocol::ProtocolSpecification;
pub use quality::QualityAllowedSpecification;
pub use restrictions::ReleaseRestrictionsSpecification;
pub use seeders::MinimumSeedersSpecification;
pub use size::AcceptableSizeSpecification;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::quota::{GrabQuota, TokenBucketQuota};
use crate::specification::{Specification, SpecificationRegistry};

/// Names of every built-in specification, in registration order.
pub const BUILTIN_SPECIFICATIONS: &[&str] = &[
    ProtocolSpecification::NAME,
    RequiredIndexerFlagsSpecification::NAME,
    ForbiddenIndexerFlagsSpecification::NAME,
    LanguageSpecification::NAME,
    QualityAllowedSpecification::NAME,
    AcceptableSizeSpecification::NAME,
    MinimumSeedersSpecification::NAME,
    ReleaseRestrictionsSpecification::NAME,
    RetentionSpecification::NAME,
    MinimumAgeSpecification::NAME,
    IndexerGrabLimitSpecification::NAME,
];

/// Build the registry of built-ins enabled by `config`.
///
/// The grab limit rule is registered only when `grab_limits` is configured.
/// `quota` replaces the in-process token bucket quota when given.
pub fn default_registry(
    config: &Config,
    quota: Option<Arc<dyn GrabQuota>>,
) -> SpecificationRegistry {
    let mut builtins: Vec<Arc<dyn Specification>> = vec![
        Arc::new(ProtocolSpecification),
        Arc::new(RequiredIndexerFlagsSpecification),
        Arc::new(ForbiddenIndexerFlagsSpecification),
        Arc::new(LanguageSpecification),
        Arc::new(QualityAllowedSpecification),
        Arc::new(AcceptableSizeSpecification),
        Arc::new(MinimumSeedersSpecification),
        Arc::new(ReleaseRestrictionsSpecification::new()),
        Arc::new(RetentionSpecification),
        Arc::new(MinimumAgeSpecification),
    ];

    if let Some(limits) = &config.grab_limits {
        let quota = quota.unwrap_or_else(|| {
            Arc::new(TokenBucketQuota::from_config(limits)) as Arc<dyn GrabQuota>
        });
        builtins.push(Arc::new(IndexerGrabLimitSpecification::new(
            quota,
            Duration::from_millis(limits.timeout_ms),
        )));
    }

    let mut builder = SpecificationRegistry::builder();
    for spec in builtins {
        if config.specifications.is_enabled(spec.name()) {
            builder = builder.register_arc(spec);
        } else {
            debug!(specification = spec.name(), "Specification disabled by configuration");
        }
    }

    let registry = builder.build();
    info!(
        count = registry.len(),
        specifications = ?registry.names(),
        "Specification registry built"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrabLimitsConfig;
    use crate::specification::SpecificationPriority;

    #[test]
    fn test_default_registry_without_grab_limits() {
        let registry = default_registry(&Config::default(), None);
        assert_eq!(registry.len(), BUILTIN_SPECIFICATIONS.len() - 1);
        assert!(!registry.names().contains(&IndexerGrabLimitSpecification::NAME));
    }

    #[test]
    fn test_default_registry_orders_by_priority() {
        let config = Config {
            grab_limits: Some(GrabLimitsConfig::default()),
            ..Default::default()
        };
        let registry = default_registry(&config, None);
        assert_eq!(registry.len(), BUILTIN_SPECIFICATIONS.len());

        let priorities: Vec<SpecificationPriority> =
            registry.iter().map(|s| s.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(registry.names().last(), Some(&IndexerGrabLimitSpecification::NAME));
    }

    #[test]
    fn test_disabled_specifications_are_skipped() {
        let mut config = Config::default();
        config.specifications.disabled = vec!["language".to_string(), "retention".to_string()];

        let registry = default_registry(&config, None);
        let names = registry.names();
        assert!(!names.contains(&"language"));
        assert!(!names.contains(&"retention"));
        assert!(names.contains(&"quality"));
    }
}
