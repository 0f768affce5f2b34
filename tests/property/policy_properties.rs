use proptest::prelude::*;
use ragpolicy::policy::{
    classify_with_rule, PolicyDefaults, ProviderQualityRule, RerankingMode, RerankingModel,
    ResolveContext, SelectedDatasetsMode, Weights,
};
use ragpolicy::{
    classify_dataset_selection, resolve_retrieval_config, Dataset, DatasetProvider,
    IndexingTechnique, PartialRetrievalConfig, RetrievalPolicy, SearchMethod,
};

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    (
        prop_oneof![
            Just(IndexingTechnique::HighQuality),
            Just(IndexingTechnique::Economy)
        ],
        prop_oneof![
            Just(SearchMethod::Semantic),
            Just(SearchMethod::FullText),
            Just(SearchMethod::Keyword),
            Just(SearchMethod::Hybrid)
        ],
        prop_oneof![Just(DatasetProvider::Internal), Just(DatasetProvider::External)],
        0usize..3,
    )
        .prop_map(|(technique, search, provider, model)| {
            Dataset::new("generated", technique, search, provider)
                .with_embedding("openai", format!("embedding-{}", model))
        })
}

fn selection_strategy() -> impl Strategy<Value = Vec<Dataset>> {
    prop::collection::vec(dataset_strategy(), 1..8)
}

fn rule_strategy() -> impl Strategy<Value = ProviderQualityRule> {
    prop_oneof![
        Just(ProviderQualityRule::ExternalDisqualifies),
        Just(ProviderQualityRule::InternalDisqualifies)
    ]
}

fn partial_strategy() -> impl Strategy<Value = PartialRetrievalConfig> {
    (
        prop::option::of(1usize..20),
        prop::option::of(0.0f32..1.0),
        prop::option::of(prop_oneof![
            Just(RerankingMode::WeightedScore),
            Just(RerankingMode::RerankingModel)
        ]),
        prop::option::of(prop_oneof![
            Just(RerankingModel::new("cohere", "rerank-english-v3.0")),
            Just(RerankingModel::default())
        ]),
        prop::option::of(0.0f32..1.0),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(top_k, score_threshold, reranking_mode, reranking_model, vector_weight, enable)| {
                PartialRetrievalConfig {
                    top_k,
                    score_threshold,
                    reranking_mode,
                    reranking_model,
                    weights: vector_weight.map(|w| Weights {
                        vector_weight: w,
                        embedding_provider_name: "openai".to_string(),
                        embedding_model_name: "embedding-0".to_string(),
                        keyword_weight: 1.0 - w,
                    }),
                    reranking_enable: enable,
                }
            },
        )
}

/// The six homogeneity flags, which only ever clear as datasets are added
fn homogeneity_flags(mode: &SelectedDatasetsMode) -> [bool; 6] {
    [
        mode.all_high_quality,
        mode.all_high_quality_vector_search,
        mode.all_high_quality_full_text_search,
        mode.all_economic,
        mode.all_internal,
        mode.all_external,
    ]
}

proptest! {
    #[test]
    fn homogeneity_flags_never_reappear(
        datasets in selection_strategy(),
        extra in dataset_strategy(),
        rule in rule_strategy(),
    ) {
        let before = homogeneity_flags(&classify_with_rule(&datasets, rule));

        let mut extended = datasets.clone();
        extended.push(extra);
        let after = homogeneity_flags(&classify_with_rule(&extended, rule));

        for (b, a) in before.iter().zip(after.iter()) {
            prop_assert!(*b || !*a, "flag turned on after extension: {:?} -> {:?}", before, after);
        }
    }

    #[test]
    fn classification_ignores_order(datasets in selection_strategy(), rule in rule_strategy()) {
        let mut reversed = datasets.clone();
        reversed.reverse();
        prop_assert_eq!(classify_with_rule(&datasets, rule), classify_with_rule(&reversed, rule));
    }

    #[test]
    fn provider_flags_are_exclusive(datasets in selection_strategy(), rule in rule_strategy()) {
        let mode = classify_with_rule(&datasets, rule);

        prop_assert!(!(mode.all_internal && mode.all_external));
        prop_assert_eq!(
            mode.mixture_internal_and_external,
            !mode.all_internal && !mode.all_external
        );
        if mode.all_high_quality || mode.all_economic {
            prop_assert!(!mode.mixture_high_quality_and_economic);
        }
        if mode.inconsistent_embedding_model {
            prop_assert!(mode.all_high_quality);
        }
    }

    #[test]
    fn internal_rule_never_classifies_internal_as_high_quality(datasets in selection_strategy()) {
        let mode = classify_with_rule(&datasets, ProviderQualityRule::InternalDisqualifies);
        if datasets.iter().any(|d| !d.is_external()) {
            prop_assert!(!mode.all_high_quality);
            prop_assert!(!mode.supports_weighted_score());
        }
    }

    #[test]
    fn resolve_is_a_fixed_point(
        partial in partial_strategy(),
        datasets in selection_strategy(),
        rule in rule_strategy(),
    ) {
        let policy = RetrievalPolicy::new(PolicyDefaults {
            provider_quality_rule: rule,
            ..PolicyDefaults::default()
        });

        let once = policy.resolve(partial, &datasets);
        let twice = policy.resolve(once.clone().into(), &datasets);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn resolve_with_context_is_a_fixed_point(
        partial in partial_strategy(),
        datasets in selection_strategy(),
        original in selection_strategy(),
        with_fallback in any::<bool>(),
    ) {
        let fallback = RerankingModel::new("cohere", "rerank-english-v3.0");
        let mut ctx = ResolveContext::default().with_original(&original);
        if with_fallback {
            ctx = ctx.with_fallback(&fallback);
        }
        let policy = RetrievalPolicy::default();

        let once = policy.resolve_with(partial, &datasets, &ctx);
        let twice = policy.resolve_with(once.clone().into(), &datasets, &ctx);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn forcing_rules_always_hold(partial in partial_strategy(), datasets in selection_strategy()) {
        let mode = classify_dataset_selection(&datasets);
        let config = resolve_retrieval_config(partial.clone(), &datasets);

        if mode.requires_reranking_model() {
            prop_assert_eq!(config.reranking_mode, Some(RerankingMode::RerankingModel));
        }
        if mode.reranking_optional() {
            prop_assert_eq!(config.reranking_enable, partial.reranking_enable);
        } else {
            prop_assert_eq!(config.reranking_enable, Some(true));
        }
        prop_assert_eq!(config.reranking_model, partial.reranking_model);
        prop_assert_eq!(config.score_threshold, partial.score_threshold);
    }

    #[test]
    fn weighted_score_selection_gets_weights(datasets in selection_strategy()) {
        let mode = classify_dataset_selection(&datasets);
        let config = resolve_retrieval_config(PartialRetrievalConfig::default(), &datasets);

        if mode.supports_weighted_score() {
            prop_assert_eq!(config.reranking_mode, Some(RerankingMode::WeightedScore));
            let weights = config.weights.expect("weights for weighted score");
            prop_assert_eq!(&weights.embedding_model_name, &datasets[0].embedding_model);
        } else {
            prop_assert!(config.weights.is_none());
        }
    }
}

#[test]
fn empty_selection_has_no_flags() {
    for rule in [
        ProviderQualityRule::ExternalDisqualifies,
        ProviderQualityRule::InternalDisqualifies,
    ] {
        assert_eq!(classify_with_rule(&[], rule), SelectedDatasetsMode::default());
    }
    assert_eq!(classify_dataset_selection(&[]), SelectedDatasetsMode::default());
}
