//! Retrieval policy resolution
//!
//! Classifies a knowledge base selection into homogeneity flags and derives a
//! consistent multi-dataset retrieval configuration (reranking mode, reranking
//! enablement, hybrid weights) from a partially filled one. Everything here is
//! pure: no I/O and no state retained between calls.

mod defaults;
mod mode;
mod resolver;
mod types;
mod validator;

pub use defaults::{
    PolicyDefaults, ProviderQualityRule, DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K,
    FULL_TEXT_SEARCH_WEIGHTS, OTHER_WEIGHTS, VECTOR_SEARCH_WEIGHTS,
};
pub use mode::{classify_dataset_selection, classify_with_rule, SelectedDatasetsMode};
pub use resolver::{resolve_retrieval_config, ResolveContext, RetrievalPolicy};
pub use types::{
    PartialRetrievalConfig, RerankingMode, RerankingModel, RetrievalConfig, WeightPair, Weights,
};
pub use validator::{RetrievalNode, RetrievalNodeValidator};
