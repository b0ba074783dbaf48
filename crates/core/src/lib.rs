pub mod config;
pub mod decision;
pub mod engine;
pub mod metrics;
pub mod quota;
pub mod release;
pub mod specification;
pub mod specifications;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, GrabLimitsConfig,
    IndexerGrabLimit, SpecificationsConfig,
};
pub use decision::{Decision, RejectionReason, RejectionType, ReleaseDecision, Verdict};
pub use engine::{DecisionEngine, EngineConfig, EngineError};
pub use quota::{GrabQuota, QuotaError, QuotaStatus, TokenBucketQuota};
pub use release::{
    CandidateRelease, IndexerFlag, IndexerInfo, IndexerSettings, Language, MediaIdentity,
    Protocol, Quality, SearchCriteria,
};
pub use specification::{
    Capabilities, Capability, Specification, SpecificationError, SpecificationPriority,
    SpecificationRegistry,
};
pub use specifications::{default_registry, BUILTIN_SPECIFICATIONS};
