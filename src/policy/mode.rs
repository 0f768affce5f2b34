//! Mode classification of a dataset selection

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::defaults::ProviderQualityRule;
use crate::dataset::{Dataset, IndexingTechnique, SearchMethod};

/// Homogeneity flags of a dataset selection
///
/// Each `all_*` flag is pessimistic: a single dataset that contradicts it
/// clears it for the whole selection. An empty selection makes no claims and
/// has every flag cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedDatasetsMode {
    pub all_high_quality: bool,
    pub all_high_quality_vector_search: bool,
    pub all_high_quality_full_text_search: bool,
    pub all_economic: bool,
    pub mixture_high_quality_and_economic: bool,
    pub all_internal: bool,
    pub all_external: bool,
    pub mixture_internal_and_external: bool,
    pub inconsistent_embedding_model: bool,
}

impl SelectedDatasetsMode {
    fn all_set() -> Self {
        Self {
            all_high_quality: true,
            all_high_quality_vector_search: true,
            all_high_quality_full_text_search: true,
            all_economic: true,
            mixture_high_quality_and_economic: true,
            all_internal: true,
            all_external: true,
            mixture_internal_and_external: true,
            inconsistent_embedding_model: true,
        }
    }

    fn clear_high_quality(&mut self) {
        self.all_high_quality = false;
        self.all_high_quality_vector_search = false;
        self.all_high_quality_full_text_search = false;
    }

    /// Fold one dataset into the flags; only ever clears
    fn observe(&mut self, dataset: &Dataset, rule: ProviderQualityRule) {
        match dataset.indexing_technique {
            IndexingTechnique::Economy => self.clear_high_quality(),
            IndexingTechnique::HighQuality => {
                self.all_economic = false;
                if dataset.search_method() != SearchMethod::Semantic {
                    self.all_high_quality_vector_search = false;
                }
                if dataset.search_method() != SearchMethod::FullText {
                    self.all_high_quality_full_text_search = false;
                }
            }
        }

        if dataset.is_external() {
            self.all_internal = false;
        } else {
            self.all_external = false;
        }

        let disqualifies = match rule {
            ProviderQualityRule::ExternalDisqualifies => dataset.is_external(),
            ProviderQualityRule::InternalDisqualifies => !dataset.is_external(),
        };
        if disqualifies {
            self.clear_high_quality();
            self.mixture_high_quality_and_economic = false;
        }
    }

    /// Weighted-score blending is meaningful: one embedding space, all
    /// internal, all high quality
    pub fn supports_weighted_score(&self) -> bool {
        self.all_high_quality && !self.inconsistent_embedding_model && self.all_internal
    }

    /// Scores across the selection are not comparable, so a reranker model
    /// is required
    pub fn requires_reranking_model(&self) -> bool {
        self.all_economic
            || self.mixture_high_quality_and_economic
            || self.inconsistent_embedding_model
            || self.all_external
            || self.mixture_internal_and_external
    }

    /// Reranking may stay off
    pub fn reranking_optional(&self) -> bool {
        (self.all_internal && self.all_economic) || self.all_external
    }
}

/// Classify a selection under the default provider rule
///
/// The default is [`ProviderQualityRule::ExternalDisqualifies`], not the
/// literal "any internal dataset clears the high-quality flags" rule; use
/// [`classify_with_rule`] with `InternalDisqualifies` to get that behavior.
pub fn classify_dataset_selection(datasets: &[Dataset]) -> SelectedDatasetsMode {
    classify_with_rule(datasets, ProviderQualityRule::default())
}

/// Classify a selection under an explicit provider rule
pub fn classify_with_rule(datasets: &[Dataset], rule: ProviderQualityRule) -> SelectedDatasetsMode {
    if datasets.is_empty() {
        return SelectedDatasetsMode::default();
    }

    let mut mode = SelectedDatasetsMode::all_set();
    for dataset in datasets {
        mode.observe(dataset, rule);
    }

    if mode.all_external || mode.all_internal {
        mode.mixture_internal_and_external = false;
    }
    if mode.all_high_quality || mode.all_economic {
        mode.mixture_high_quality_and_economic = false;
    }

    mode.inconsistent_embedding_model = mode.all_high_quality && {
        let models: AHashSet<&str> = datasets
            .iter()
            .map(|d| d.embedding_model.as_str())
            .collect();
        models.len() > 1
    };

    tracing::debug!(datasets = datasets.len(), ?rule, ?mode, "Classified dataset selection");

    mode
}
