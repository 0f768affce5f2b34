use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{PolicyError, Result, ValidationError};
use crate::policy::WeightPair;

const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_retrieval(config, &mut errors);
        Self::validate_weights(config, &mut errors);
        Self::validate_policy(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PolicyError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_retrieval(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.retrieval.top_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.top_k",
                "Top K must be greater than 0",
            ));
        }

        let threshold = config.retrieval.score_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            errors.push(ValidationError::new(
                "retrieval.score_threshold",
                format!("Score threshold must be between 0.0 and 1.0, got {}", threshold),
            ));
        }
    }

    fn validate_weights(config: &Config, errors: &mut Vec<ValidationError>) {
        let pairs = [
            ("weights.vector_search", &config.weights.vector_search),
            ("weights.full_text_search", &config.weights.full_text_search),
            ("weights.other", &config.weights.other),
        ];

        for (path, pair) in pairs {
            if let Some(message) = Self::check_pair(pair) {
                errors.push(ValidationError::new(path, message));
            }
        }
    }

    fn validate_policy(config: &Config, errors: &mut Vec<ValidationError>) {
        // A half-filled fallback would be silently ignored by the resolver
        if let Some(model) = &config.policy.fallback_rerank_model {
            if !model.is_complete() {
                errors.push(ValidationError::new(
                    "policy.fallback_rerank_model",
                    "Fallback rerank model needs both provider and model",
                ));
            }
        }
    }

    fn check_pair(pair: &WeightPair) -> Option<String> {
        let in_range = |w: f32| (0.0..=1.0).contains(&w);
        if !in_range(pair.semantic) || !in_range(pair.keyword) {
            return Some(format!(
                "Weights must be between 0.0 and 1.0, got {} / {}",
                pair.semantic, pair.keyword
            ));
        }

        let sum = pair.semantic + pair.keyword;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Some(format!("Weights must sum to 1.0, got {}", sum));
        }

        None
    }
}
