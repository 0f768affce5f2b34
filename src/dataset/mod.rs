//! Knowledge base descriptors
//!
//! A dataset is read-only input to the policy resolver: only its indexing
//! technique, stored search method, provider and embedding model are consulted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a dataset's documents were indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingTechnique {
    /// Vector embeddings
    HighQuality,
    /// Keyword / inverted index only
    Economy,
}

/// Retrieval algorithm a dataset was configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMethod {
    #[serde(rename = "semantic_search")]
    Semantic,
    #[serde(rename = "full_text_search")]
    FullText,
    #[serde(rename = "keyword_search")]
    Keyword,
    #[serde(rename = "hybrid_search")]
    Hybrid,
}

/// Where a dataset is hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetProvider {
    /// Hosted within the platform
    #[default]
    Internal,
    /// Federated / third-party knowledge source
    External,
}

/// The retrieval settings stored with a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRetrievalModel {
    pub search_method: SearchMethod,
}

/// A selectable knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique dataset identifier
    pub id: Uuid,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    pub indexing_technique: IndexingTechnique,

    /// Stored retrieval configuration
    pub retrieval_model: DatasetRetrievalModel,

    #[serde(default)]
    pub provider: DatasetProvider,

    /// Embedding model name (high-quality internal datasets only)
    #[serde(default)]
    pub embedding_model: String,

    /// Embedding model provider (high-quality internal datasets only)
    #[serde(default)]
    pub embedding_model_provider: String,
}

impl Dataset {
    /// Create a dataset with a fresh ID and no embedding model
    pub fn new(
        name: impl Into<String>,
        indexing_technique: IndexingTechnique,
        search_method: SearchMethod,
        provider: DatasetProvider,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            indexing_technique,
            retrieval_model: DatasetRetrievalModel { search_method },
            provider,
            embedding_model: String::new(),
            embedding_model_provider: String::new(),
        }
    }

    /// Set the embedding model this dataset was indexed with
    pub fn with_embedding(
        mut self,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        self.embedding_model_provider = provider.into();
        self.embedding_model = model.into();
        self
    }

    pub fn search_method(&self) -> SearchMethod {
        self.retrieval_model.search_method
    }

    pub fn is_external(&self) -> bool {
        self.provider == DatasetProvider::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "id": "3f0d6f5e-8f5c-4a43-9a53-0c3b1c7a2e11",
            "indexing_technique": "economy",
            "retrieval_model": { "search_method": "keyword_search" }
        }"#;

        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.provider, DatasetProvider::Internal);
        assert_eq!(dataset.search_method(), SearchMethod::Keyword);
        assert!(dataset.embedding_model.is_empty());
        assert_eq!(dataset.indexing_technique, IndexingTechnique::Economy);
    }

    #[test]
    fn test_search_method_wire_names() {
        let json = serde_json::to_string(&SearchMethod::FullText).unwrap();
        assert_eq!(json, "\"full_text_search\"");

        let parsed: SearchMethod = serde_json::from_str("\"hybrid_search\"").unwrap();
        assert_eq!(parsed, SearchMethod::Hybrid);
    }

    #[test]
    fn test_with_embedding() {
        let dataset = Dataset::new(
            "docs",
            IndexingTechnique::HighQuality,
            SearchMethod::Semantic,
            DatasetProvider::Internal,
        )
        .with_embedding("openai", "text-embedding-3-small");

        assert_eq!(dataset.embedding_model, "text-embedding-3-small");
        assert_eq!(dataset.embedding_model_provider, "openai");
        assert!(!dataset.is_external());
    }
}
