//! Retrieval configuration records shared by the resolver and its callers

use serde::{Deserialize, Serialize};

use super::defaults::PolicyDefaults;

/// How merged multi-dataset candidates are re-scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankingMode {
    /// Linear combination of per-method scores
    WeightedScore,
    /// A secondary model re-scores the merged candidate set
    RerankingModel,
}

/// Reranker model reference
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RerankingModel {
    pub provider: String,
    pub model: String,
}

impl RerankingModel {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Both provider and model are filled in
    pub fn is_complete(&self) -> bool {
        !self.provider.is_empty() && !self.model.is_empty()
    }
}

/// Hybrid weighting for the weighted-score reranking mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub vector_weight: f32,
    pub embedding_provider_name: String,
    pub embedding_model_name: String,
    pub keyword_weight: f32,
}

/// A semantic / keyword weight pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    pub semantic: f32,
    pub keyword: f32,
}

impl WeightPair {
    pub const fn new(semantic: f32, keyword: f32) -> Self {
        Self { semantic, keyword }
    }
}

/// Fully resolved multi-dataset retrieval configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,

    #[serde(default)]
    pub score_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranking_mode: Option<RerankingMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranking_model: Option<RerankingModel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranking_enable: Option<bool>,
}

impl RetrievalConfig {
    /// Reranking is switched on (an unset flag counts as off)
    pub fn reranking_enabled(&self) -> bool {
        self.reranking_enable.unwrap_or(false)
    }
}

/// Caller-supplied retrieval configuration with any field left unset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialRetrievalConfig {
    pub top_k: Option<usize>,
    pub score_threshold: Option<f32>,
    pub reranking_mode: Option<RerankingMode>,
    pub reranking_model: Option<RerankingModel>,
    pub weights: Option<Weights>,
    pub reranking_enable: Option<bool>,
}

impl PartialRetrievalConfig {
    /// Initial form state: top-k and score threshold from the domain defaults
    pub fn seeded(defaults: &PolicyDefaults) -> Self {
        Self {
            top_k: Some(defaults.top_k),
            score_threshold: Some(defaults.score_threshold),
            ..Self::default()
        }
    }
}

impl From<RetrievalConfig> for PartialRetrievalConfig {
    fn from(config: RetrievalConfig) -> Self {
        Self {
            top_k: Some(config.top_k),
            score_threshold: config.score_threshold,
            reranking_mode: config.reranking_mode,
            reranking_model: config.reranking_model,
            weights: config.weights,
            reranking_enable: config.reranking_enable,
        }
    }
}
