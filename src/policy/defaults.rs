//! Domain constants consumed by the policy resolver

use serde::{Deserialize, Serialize};

use super::types::WeightPair;

pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.8;

/// All-high-quality selections that only use semantic search
pub const VECTOR_SEARCH_WEIGHTS: WeightPair = WeightPair::new(1.0, 0.0);
/// All-high-quality selections that only use full-text search
pub const FULL_TEXT_SEARCH_WEIGHTS: WeightPair = WeightPair::new(0.0, 1.0);
/// Every other high-quality selection
pub const OTHER_WEIGHTS: WeightPair = WeightPair::new(0.7, 0.3);

/// Which provider's datasets disqualify the "all high quality" flag family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderQualityRule {
    /// External knowledge sources carry no indexing guarantees, so any
    /// external dataset rules out a high-quality classification.
    #[default]
    ExternalDisqualifies,
    /// Any internal dataset rules out a high-quality classification. Under
    /// this rule `all_high_quality && all_internal` can never hold.
    InternalDisqualifies,
}

/// Constants the resolver fills into a partial configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefaults {
    pub top_k: usize,
    pub score_threshold: f32,
    pub vector_search: WeightPair,
    pub full_text_search: WeightPair,
    pub other: WeightPair,
    pub provider_quality_rule: ProviderQualityRule,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            vector_search: VECTOR_SEARCH_WEIGHTS,
            full_text_search: FULL_TEXT_SEARCH_WEIGHTS,
            other: OTHER_WEIGHTS,
            provider_quality_rule: ProviderQualityRule::default(),
        }
    }
}
