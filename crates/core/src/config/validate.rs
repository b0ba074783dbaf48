use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::specifications::BUILTIN_SPECIFICATIONS;

/// Validate configuration
/// Currently validates:
/// - Engine timeout and parallelism are not 0
/// - Disabled specifications name known built-ins
/// - Grab limit indexers are named once and the quota timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.engine.specification_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "engine.specification_timeout_ms cannot be 0".to_string(),
        ));
    }

    if config.engine.max_parallel_candidates == 0 {
        return Err(ConfigError::ValidationError(
            "engine.max_parallel_candidates cannot be 0".to_string(),
        ));
    }

    for name in &config.specifications.disabled {
        if !BUILTIN_SPECIFICATIONS.contains(&name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "specifications.disabled contains unknown specification '{}'",
                name
            )));
        }
    }

    if let Some(limits) = &config.grab_limits {
        if limits.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "grab_limits.timeout_ms cannot be 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for indexer in &limits.indexers {
            if indexer.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "grab_limits.indexers entries need a name".to_string(),
                ));
            }
            if !seen.insert(indexer.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "grab_limits.indexers lists '{}' more than once",
                    indexer.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GrabLimitsConfig, IndexerGrabLimit};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.engine.specification_timeout_ms = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_parallelism_fails() {
        let mut config = Config::default();
        config.engine.max_parallel_candidates = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_unknown_disabled_specification() {
        let mut config = Config::default();
        config.specifications.disabled = vec!["language".to_string()];
        assert!(validate_config(&config).is_ok());

        config.specifications.disabled.push("no_such_rule".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("no_such_rule"));
    }

    #[test]
    fn test_validate_duplicate_grab_limit_indexer() {
        let limit = IndexerGrabLimit {
            name: "tracker".to_string(),
            per_hour: 5,
        };
        let config = Config {
            grab_limits: Some(GrabLimitsConfig {
                indexers: vec![limit.clone(), limit],
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_zero_quota_timeout_fails() {
        let config = Config {
            grab_limits: Some(GrabLimitsConfig {
                timeout_ms: 0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
