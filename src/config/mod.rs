//! Configuration management for ragpolicy
//!
//! Holds the domain constants the resolver consumes (default top-k, score
//! threshold, weight pairs, provider rule) and an optional workspace fallback
//! reranker, loaded from TOML with profile and environment overrides.

use crate::error::{PolicyError, Result};
use crate::policy::{PolicyDefaults, ProviderQualityRule, RerankingModel, WeightPair};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub retrieval: RetrievalDefaultsConfig,
    pub weights: WeightsConfig,
    pub policy: PolicyConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Values a retrieval form starts from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalDefaultsConfig {
    pub top_k: usize,
    pub score_threshold: f32,
}

/// Default semantic / keyword weight pairs for weighted-score reranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsConfig {
    pub vector_search: WeightPair,
    pub full_text_search: WeightPair,
    pub other: WeightPair,
}

/// Classification and reranker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub provider_quality_rule: ProviderQualityRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_rerank_model: Option<RerankingModel>,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_quality_rule: Option<ProviderQualityRule>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PolicyError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| PolicyError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| PolicyError::Config(format!("Unknown profile: {}", profile)))?;

        if let Some(top_k) = overrides.top_k {
            self.retrieval.top_k = top_k;
        }
        if let Some(threshold) = overrides.score_threshold {
            self.retrieval.score_threshold = threshold;
        }
        if let Some(rule) = overrides.provider_quality_rule {
            self.policy.provider_quality_rule = rule;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: RAGPOLICY_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("RAGPOLICY_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        let invalid = |kind: &str| PolicyError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}' as {}", value, kind),
        };

        match path {
            "RETRIEVAL__TOP_K" => {
                self.retrieval.top_k = value.parse().map_err(|_| invalid("integer"))?;
            }
            "RETRIEVAL__SCORE_THRESHOLD" => {
                self.retrieval.score_threshold = value.parse().map_err(|_| invalid("float"))?;
            }
            "POLICY__PROVIDER_QUALITY_RULE" => {
                self.policy.provider_quality_rule = match value {
                    "external_disqualifies" => ProviderQualityRule::ExternalDisqualifies,
                    "internal_disqualifies" => ProviderQualityRule::InternalDisqualifies,
                    _ => return Err(invalid("provider quality rule")),
                };
            }
            "POLICY__FALLBACK_PROVIDER" => {
                self.policy
                    .fallback_rerank_model
                    .get_or_insert_with(RerankingModel::default)
                    .provider = value.to_string();
            }
            "POLICY__FALLBACK_MODEL" => {
                self.policy
                    .fallback_rerank_model
                    .get_or_insert_with(RerankingModel::default)
                    .model = value.to_string();
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Domain constants for the resolver
    pub fn policy_defaults(&self) -> PolicyDefaults {
        PolicyDefaults {
            top_k: self.retrieval.top_k,
            score_threshold: self.retrieval.score_threshold,
            vector_search: self.weights.vector_search,
            full_text_search: self.weights.full_text_search,
            other: self.weights.other,
            provider_quality_rule: self.policy.provider_quality_rule,
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PolicyError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("ragpolicy").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        let defaults = PolicyDefaults::default();

        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            retrieval: RetrievalDefaultsConfig {
                top_k: defaults.top_k,
                score_threshold: defaults.score_threshold,
            },
            weights: WeightsConfig {
                vector_search: defaults.vector_search,
                full_text_search: defaults.full_text_search,
                other: defaults.other,
            },
            policy: PolicyConfig {
                provider_quality_rule: defaults.provider_quality_rule,
                fallback_rerank_model: None,
            },
            profiles: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.retrieval.top_k = 6;
        config.policy.fallback_rerank_model =
            Some(RerankingModel::new("cohere", "rerank-english-v3.0"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(loaded.weights.other, config.weights.other);
        assert_eq!(
            loaded.policy.fallback_rerank_model,
            config.policy.fallback_rerank_model
        );
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(&temp.path().join("missing.toml"));
        assert!(matches!(result, Err(PolicyError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_parse_literal_rule() {
        let toml_str = r#"
            [_meta]
            schema_version = "1.0.0"

            [retrieval]
            top_k = 3
            score_threshold = 0.5

            [weights.vector_search]
            semantic = 1.0
            keyword = 0.0

            [weights.full_text_search]
            semantic = 0.0
            keyword = 1.0

            [weights.other]
            semantic = 0.6
            keyword = 0.4

            [policy]
            provider_quality_rule = "internal_disqualifies"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let defaults = config.policy_defaults();
        assert_eq!(defaults.top_k, 3);
        assert_eq!(defaults.other, WeightPair::new(0.6, 0.4));
        assert_eq!(
            defaults.provider_quality_rule,
            ProviderQualityRule::InternalDisqualifies
        );
        assert!(config.policy.fallback_rerank_model.is_none());
    }

    #[test]
    fn test_apply_profile() {
        let mut config = Config::default();
        config.profiles.insert(
            "wide".to_string(),
            ProfileOverrides {
                top_k: Some(20),
                score_threshold: None,
                provider_quality_rule: None,
            },
        );

        config.apply_profile("wide").unwrap();
        assert_eq!(config.retrieval.top_k, 20);
        assert!(config.apply_profile("missing").is_err());
    }

    #[test]
    fn test_env_values() {
        let mut config = Config::default();

        config.set_value_from_env("RETRIEVAL__TOP_K", "8").unwrap();
        config
            .set_value_from_env("POLICY__PROVIDER_QUALITY_RULE", "internal_disqualifies")
            .unwrap();
        config.set_value_from_env("POLICY__FALLBACK_PROVIDER", "cohere").unwrap();
        config.set_value_from_env("POLICY__FALLBACK_MODEL", "rerank-v3").unwrap();

        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(
            config.policy.provider_quality_rule,
            ProviderQualityRule::InternalDisqualifies
        );
        assert_eq!(
            config.policy.fallback_rerank_model,
            Some(RerankingModel::new("cohere", "rerank-v3"))
        );

        assert!(config.set_value_from_env("RETRIEVAL__TOP_K", "many").is_err());
        assert!(config
            .set_value_from_env("POLICY__PROVIDER_QUALITY_RULE", "nobody")
            .is_err());
    }
}
