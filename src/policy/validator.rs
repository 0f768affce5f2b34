use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{RerankingMode, RetrievalConfig};
use crate::error::{PolicyError, Result, ValidationError};

const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

/// A knowledge-retrieval node's persisted selection and configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalNode {
    pub dataset_ids: Vec<Uuid>,
    pub config: RetrievalConfig,
}

/// Caller-side checks run before a retrieval node is saved
///
/// The resolver never calls this; it fills defaults but does not reject
/// anything.
pub struct RetrievalNodeValidator;

impl RetrievalNodeValidator {
    /// Validate the node, collecting every failure
    pub fn validate(node: &RetrievalNode) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_selection(node, &mut errors);
        Self::validate_limits(&node.config, &mut errors);
        Self::validate_reranking(&node.config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PolicyError::NodeValidation { errors })
        }
    }

    fn validate_selection(node: &RetrievalNode, errors: &mut Vec<ValidationError>) {
        if node.dataset_ids.is_empty() {
            errors.push(ValidationError::new(
                "dataset_ids",
                "At least one knowledge base must be selected",
            ));
        }
    }

    fn validate_limits(config: &RetrievalConfig, errors: &mut Vec<ValidationError>) {
        if config.top_k == 0 {
            errors.push(ValidationError::new(
                "config.top_k",
                "Top K must be greater than 0",
            ));
        }

        if let Some(threshold) = config.score_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                errors.push(ValidationError::new(
                    "config.score_threshold",
                    format!("Score threshold must be between 0.0 and 1.0, got {}", threshold),
                ));
            }
        }
    }

    fn validate_reranking(config: &RetrievalConfig, errors: &mut Vec<ValidationError>) {
        match config.reranking_mode {
            Some(RerankingMode::RerankingModel) if config.reranking_enabled() => {
                let complete = config
                    .reranking_model
                    .as_ref()
                    .is_some_and(|m| m.is_complete());
                if !complete {
                    errors.push(ValidationError::new(
                        "config.reranking_model",
                        "Reranking model is required",
                    ));
                }
            }
            Some(RerankingMode::WeightedScore) => {
                let Some(weights) = &config.weights else {
                    errors.push(ValidationError::new(
                        "config.weights",
                        "Weights are required for weighted score reranking",
                    ));
                    return;
                };

                for (path, value) in [
                    ("config.weights.vector_weight", weights.vector_weight),
                    ("config.weights.keyword_weight", weights.keyword_weight),
                ] {
                    if !(0.0..=1.0).contains(&value) {
                        errors.push(ValidationError::new(
                            path,
                            format!("Weight must be between 0.0 and 1.0, got {}", value),
                        ));
                    }
                }

                let sum = weights.vector_weight + weights.keyword_weight;
                if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                    errors.push(ValidationError::new(
                        "config.weights",
                        format!("Vector and keyword weights must sum to 1.0, got {}", sum),
                    ));
                }
            }
            _ => {}
        }
    }
}
