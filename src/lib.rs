//! ragpolicy - Retrieval Policy Resolver
//!
//! Classifies the knowledge bases selected by a retrieval workflow node and
//! derives a consistent multi-dataset retrieval configuration: reranking mode,
//! reranking enablement and hybrid weights that stay valid across datasets
//! with mixed indexing techniques, search methods and providers.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod policy;

pub use dataset::{Dataset, DatasetProvider, IndexingTechnique, SearchMethod};
pub use error::{PolicyError, Result};
pub use policy::{
    classify_dataset_selection, resolve_retrieval_config, PartialRetrievalConfig, RetrievalConfig,
    RetrievalPolicy, SelectedDatasetsMode,
};
