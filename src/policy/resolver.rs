//! Derivation of a complete retrieval configuration from a partial one

use ahash::AHashSet;
use uuid::Uuid;

use super::defaults::PolicyDefaults;
use super::mode::{classify_with_rule, SelectedDatasetsMode};
use super::types::{
    PartialRetrievalConfig, RerankingMode, RerankingModel, RetrievalConfig, WeightPair, Weights,
};
use crate::dataset::Dataset;

/// Optional inputs for selection-aware resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    /// Selection the partial configuration was last resolved against
    pub original_datasets: Option<&'a [Dataset]>,

    /// Workspace default reranker, used where a reranker model is needed
    /// but the caller has none
    pub fallback_rerank_model: Option<&'a RerankingModel>,
}

impl<'a> ResolveContext<'a> {
    pub fn with_original(mut self, datasets: &'a [Dataset]) -> Self {
        self.original_datasets = Some(datasets);
        self
    }

    pub fn with_fallback(mut self, model: &'a RerankingModel) -> Self {
        self.fallback_rerank_model = Some(model);
        self
    }

    fn valid_fallback(&self) -> Option<&'a RerankingModel> {
        self.fallback_rerank_model.filter(|m| m.is_complete())
    }

    fn selection_changed(&self, selected: &[Dataset]) -> bool {
        let Some(original) = self.original_datasets else {
            return false;
        };
        let before: AHashSet<Uuid> = original.iter().map(|d| d.id).collect();
        let after: AHashSet<Uuid> = selected.iter().map(|d| d.id).collect();
        before.symmetric_difference(&after).next().is_some()
    }
}

/// Retrieval policy bound to a set of domain constants
#[derive(Debug, Clone, Default)]
pub struct RetrievalPolicy {
    defaults: PolicyDefaults,
}

impl RetrievalPolicy {
    pub fn new(defaults: PolicyDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &PolicyDefaults {
        &self.defaults
    }

    /// Classify a selection under this policy's provider rule
    pub fn classify(&self, datasets: &[Dataset]) -> SelectedDatasetsMode {
        classify_with_rule(datasets, self.defaults.provider_quality_rule)
    }

    /// Fill policy defaults into `partial` for the given selection
    pub fn resolve(
        &self,
        partial: PartialRetrievalConfig,
        datasets: &[Dataset],
    ) -> RetrievalConfig {
        self.resolve_with(partial, datasets, &ResolveContext::default())
    }

    /// Fill policy defaults, also reacting to a changed selection and to a
    /// workspace fallback reranker
    pub fn resolve_with(
        &self,
        partial: PartialRetrievalConfig,
        datasets: &[Dataset],
        ctx: &ResolveContext<'_>,
    ) -> RetrievalConfig {
        let mode = self.classify(datasets);
        let fallback = ctx.valid_fallback();

        let mut config = RetrievalConfig {
            top_k: partial.top_k.unwrap_or(self.defaults.top_k),
            score_threshold: partial.score_threshold,
            reranking_mode: partial.reranking_mode,
            reranking_model: partial.reranking_model,
            weights: partial.weights,
            reranking_enable: if mode.reranking_optional() {
                partial.reranking_enable
            } else {
                Some(true)
            },
        };

        if mode.requires_reranking_model() {
            config.reranking_mode = Some(RerankingMode::RerankingModel);
            tracing::debug!("Selection scores are not comparable, using reranking model");
        }

        if mode.supports_weighted_score() {
            if config.reranking_mode.is_none() {
                config.reranking_mode = Some(if fallback.is_some() {
                    RerankingMode::RerankingModel
                } else {
                    RerankingMode::WeightedScore
                });
            }

            let weighted = config.reranking_mode == Some(RerankingMode::WeightedScore);
            if weighted && config.weights.is_none() {
                config.weights = Some(self.default_weights(&mode, datasets));
            }

            if ctx.selection_changed(datasets) {
                self.reset_for_new_selection(&mut config, &mode, datasets, fallback.is_some());
            }
        }

        if config.reranking_mode == Some(RerankingMode::RerankingModel) {
            if let Some(fallback) = fallback {
                let incomplete = config
                    .reranking_model
                    .as_ref()
                    .map_or(true, |m| !m.is_complete());
                if incomplete {
                    config.reranking_model = Some(fallback.clone());
                }
            }
        }

        tracing::debug!(
            reranking_mode = ?config.reranking_mode,
            reranking_enable = ?config.reranking_enable,
            has_weights = config.weights.is_some(),
            "Resolved retrieval config"
        );

        config
    }

    /// Caller-chosen weights or reranker no longer fit a changed selection.
    /// A usable fallback reranker wins over weights; without one the
    /// selection falls back to default weights.
    fn reset_for_new_selection(
        &self,
        config: &mut RetrievalConfig,
        mode: &SelectedDatasetsMode,
        datasets: &[Dataset],
        has_fallback: bool,
    ) {
        match (config.reranking_mode, has_fallback) {
            (Some(RerankingMode::WeightedScore), true) => {
                config.reranking_mode = Some(RerankingMode::RerankingModel);
            }
            (Some(_), false) => {
                config.reranking_mode = Some(RerankingMode::WeightedScore);
                config.weights = Some(self.default_weights(mode, datasets));
            }
            _ => {}
        }
        tracing::debug!(
            reranking_mode = ?config.reranking_mode,
            "Selection changed, reset reranking"
        );
    }

    fn default_weights(&self, mode: &SelectedDatasetsMode, datasets: &[Dataset]) -> Weights {
        let pair: WeightPair = if mode.all_high_quality_vector_search {
            self.defaults.vector_search
        } else if mode.all_high_quality_full_text_search {
            self.defaults.full_text_search
        } else {
            self.defaults.other
        };

        let (provider, model) = datasets
            .first()
            .map(|d| (d.embedding_model_provider.clone(), d.embedding_model.clone()))
            .unwrap_or_default();

        Weights {
            vector_weight: pair.semantic,
            embedding_provider_name: provider,
            embedding_model_name: model,
            keyword_weight: pair.keyword,
        }
    }
}

/// Resolve `partial` against `datasets` with the default domain constants
pub fn resolve_retrieval_config(
    partial: PartialRetrievalConfig,
    datasets: &[Dataset],
) -> RetrievalConfig {
    RetrievalPolicy::default().resolve(partial, datasets)
}
