use ragpolicy::cli::{Cli, Commands, ConfigAction};
use ragpolicy::config::Config;
use ragpolicy::error::{PolicyError, Result};
use ragpolicy::policy::{
    PartialRetrievalConfig, RerankingModel, ResolveContext, RetrievalConfig, RetrievalNode,
    RetrievalNodeValidator, RetrievalPolicy, SelectedDatasetsMode,
};
use ragpolicy::Dataset;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

fn main() {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("✗ {}", e);
        if let PolicyError::NodeValidation { errors } | PolicyError::ConfigValidation { errors } =
            &e
        {
            for error in errors {
                eprintln!("  - {}: {}", error.path, error.message);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classify { datasets, json } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_classify(&config, &datasets, json)?;
        }
        Commands::Resolve {
            datasets,
            partial,
            original,
            fallback_provider,
            fallback_model,
            json,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            let fallback = match (fallback_provider, fallback_model) {
                (Some(provider), Some(model)) => Some(RerankingModel::new(provider, model)),
                _ => config.policy.fallback_rerank_model.clone(),
            };
            cmd_resolve(
                &config,
                &datasets,
                partial.as_deref(),
                original.as_deref(),
                fallback.as_ref(),
                json,
            )?;
        }
        Commands::Validate { node } => {
            cmd_validate(&node)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "ragpolicy=debug" } else { "ragpolicy=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_classify(config: &Config, datasets_path: &Path, json: bool) -> Result<()> {
    let datasets: Vec<Dataset> = read_json(datasets_path, "datasets")?;
    let policy = RetrievalPolicy::new(config.policy_defaults());
    let mode = policy.classify(&datasets);

    if json {
        println!("{}", to_json(&mode)?);
    } else {
        print_mode(&mode, datasets.len());
    }

    Ok(())
}

fn cmd_resolve(
    config: &Config,
    datasets_path: &Path,
    partial_path: Option<&Path>,
    original_path: Option<&Path>,
    fallback: Option<&RerankingModel>,
    json: bool,
) -> Result<()> {
    let datasets: Vec<Dataset> = read_json(datasets_path, "datasets")?;
    let policy = RetrievalPolicy::new(config.policy_defaults());

    let partial = match partial_path {
        Some(path) => read_json(path, "partial retrieval config")?,
        None => PartialRetrievalConfig::seeded(policy.defaults()),
    };
    let original: Option<Vec<Dataset>> = original_path
        .map(|path| read_json(path, "original datasets"))
        .transpose()?;

    let mut ctx = ResolveContext::default();
    if let Some(original) = &original {
        ctx = ctx.with_original(original);
    }
    if let Some(fallback) = fallback {
        ctx = ctx.with_fallback(fallback);
    }

    tracing::info!(datasets = datasets.len(), "Resolving retrieval config");
    let resolved = policy.resolve_with(partial, &datasets, &ctx);

    if json {
        println!("{}", to_json(&resolved)?);
    } else {
        print_config(&resolved);
    }

    Ok(())
}

fn cmd_validate(node_path: &Path) -> Result<()> {
    let node: RetrievalNode = read_json(node_path, "retrieval node")?;
    RetrievalNodeValidator::validate(&node)?;
    println!("✓ Retrieval node is valid");
    println!("  Datasets: {}", node.dataset_ids.len());
    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| PolicyError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::debug!(
            "Config file not found, using defaults. Run 'ragpolicy config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        return Ok(config);
    }

    if let Some(profile) = profile {
        Config::load_with_profile(&path, &profile)
    } else {
        Config::load(&path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
        source: e,
        context: format!("Failed to read {} file: {:?}", what, path),
    })?;
    serde_json::from_str(&content).map_err(|e| PolicyError::Json {
        source: e,
        context: format!("Failed to parse {} from {:?}", what, path),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| PolicyError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })
}

fn print_mode(mode: &SelectedDatasetsMode, count: usize) {
    let flags = [
        ("all_high_quality", mode.all_high_quality),
        ("all_high_quality_vector_search", mode.all_high_quality_vector_search),
        ("all_high_quality_full_text_search", mode.all_high_quality_full_text_search),
        ("all_economic", mode.all_economic),
        ("mixture_high_quality_and_economic", mode.mixture_high_quality_and_economic),
        ("all_internal", mode.all_internal),
        ("all_external", mode.all_external),
        ("mixture_internal_and_external", mode.mixture_internal_and_external),
        ("inconsistent_embedding_model", mode.inconsistent_embedding_model),
    ];

    println!("Dataset Selection ({} datasets)", count);
    println!("=================");
    for (name, value) in flags {
        println!("  {:<36} {}", name, if value { "yes" } else { "no" });
    }
}

fn print_config(config: &RetrievalConfig) {
    println!("Resolved Retrieval Config");
    println!("=========================");
    println!("  top_k:            {}", config.top_k);
    match config.score_threshold {
        Some(threshold) => println!("  score_threshold:  {}", threshold),
        None => println!("  score_threshold:  (none)"),
    }
    println!(
        "  reranking:        {}",
        if config.reranking_enabled() { "enabled" } else { "disabled" }
    );
    match config.reranking_mode {
        Some(mode) => println!("  reranking_mode:   {:?}", mode),
        None => println!("  reranking_mode:   (unset)"),
    }
    if let Some(model) = &config.reranking_model {
        println!("  reranking_model:  {}/{}", model.provider, model.model);
    }
    if let Some(weights) = &config.weights {
        println!(
            "  weights:          vector {} / keyword {} ({}/{})",
            weights.vector_weight,
            weights.keyword_weight,
            weights.embedding_provider_name,
            weights.embedding_model_name
        );
    }
}
