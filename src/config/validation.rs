//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, score constant > 0)
//! - Check recipes are usable (paths, pointers, canary placeholders)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RankerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{Dialect, ProbeStep, RankerConfig, Validator};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("probe.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("probe.score_constant must be a positive finite number")]
    InvalidScoreConstant,

    #[error("dialect {0} has no probe steps")]
    EmptyRecipe(Dialect),

    #[error("step '{step}' in dialect {dialect}: {reason}")]
    InvalidStep {
        dialect: Dialect,
        step: String,
        reason: String,
    },

    #[error("{0} uses {{canary}} but probe.canary_streams is empty")]
    MissingCanary(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RankerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if !(config.probe.score_constant.is_finite() && config.probe.score_constant > 0.0) {
        errors.push(ValidationError::InvalidScoreConstant);
    }

    let no_canaries = config.probe.canary_streams.is_empty();

    for dialect in Dialect::ALL {
        let steps = config.dialects.recipe(dialect);
        if steps.is_empty() {
            errors.push(ValidationError::EmptyRecipe(dialect));
        }
        for step in steps {
            check_step(dialect, step, &mut errors);
            if no_canaries && step.path.contains("{canary}") {
                errors.push(ValidationError::MissingCanary(format!(
                    "step '{}' in dialect {}",
                    step.name, dialect
                )));
            }
        }
    }

    let consistency = &config.consistency;
    let consistency_needs_canary = consistency.canary.is_none()
        && (consistency.primary_path.contains("{canary}")
            || consistency.secondary_path.contains("{canary}"));
    if no_canaries && consistency_needs_canary {
        errors.push(ValidationError::MissingCanary("consistency probe".to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_step(dialect: Dialect, step: &ProbeStep, errors: &mut Vec<ValidationError>) {
    let mut invalid = |reason: &str| {
        errors.push(ValidationError::InvalidStep {
            dialect,
            step: step.name.clone(),
            reason: reason.to_string(),
        })
    };

    if !step.path.starts_with('/') {
        invalid("path must start with '/'");
    }
    if step.canary.is_some() && !step.path.contains("{canary}") {
        invalid("canary index set on a path without {canary}");
    }
    if !(step.weight.is_finite() && step.weight > 0.0) {
        invalid("weight must be a positive finite number");
    }
    match &step.validator {
        Validator::JsonField { pointer } | Validator::NonEmpty { pointer } => {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                invalid("JSON pointer must be empty or start with '/'");
            }
        }
        Validator::ContentType { prefix } => {
            if prefix.is_empty() {
                invalid("content-type prefix must not be empty");
            }
        }
    }
    if let Some(follow) = &step.follow {
        if matches!(step.validator, Validator::ContentType { .. }) {
            invalid("follow-up requires a JSON manifest validator");
        }
        if !follow.list_pointer.starts_with('/') {
            invalid("follow-up list_pointer must start with '/'");
        }
        if !(follow.weight.is_finite() && follow.weight > 0.0) {
            invalid("follow-up weight must be a positive finite number");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RankerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RankerConfig::default();
        config.probe.timeout_ms = 0;
        config.probe.score_constant = -1.0;
        config.dialects.tertiary.clear();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::InvalidScoreConstant));
        assert!(errors.contains(&ValidationError::EmptyRecipe(Dialect::Tertiary)));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_canary_placeholder_requires_streams() {
        let mut config = RankerConfig::default();
        config.probe.canary_streams.clear();

        let errors = validate_config(&config).unwrap_err();
        // two primary streams steps, two secondary videos steps, consistency probe
        let missing = errors
            .iter()
            .filter(|e| matches!(e, ValidationError::MissingCanary(_)))
            .count();
        assert_eq!(missing, 5);
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_single_canary_is_valid() {
        // Steps pinned to the missing second canary are skipped, not rejected.
        let mut config = RankerConfig::default();
        config.probe.canary_streams.truncate(1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_pinned_canary_needs_placeholder() {
        let mut config = RankerConfig::default();
        config.dialects.tertiary[0].canary = Some(0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("without {canary}"));
    }

    #[test]
    fn test_bad_step() {
        let mut config = RankerConfig::default();
        config.dialects.primary[0].path = "opensearch".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("path must start with '/'"));
    }
}
