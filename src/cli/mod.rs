//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ragpolicy",
    version,
    author = "neur0map",
    about = "Resolve retrieval policy for multi-dataset knowledge retrieval",
    long_about = "ragpolicy classifies a selection of knowledge bases by indexing technique, search \
                  method and provider, and derives the reranking mode, reranking enablement and hybrid \
                  weights a multi-dataset retrieval node should use."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/ragpolicy/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the config file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a dataset selection into mode flags
    Classify {
        /// JSON file holding an array of datasets
        datasets: PathBuf,

        /// Print flags as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a partial retrieval config against a dataset selection
    Resolve {
        /// JSON file holding an array of datasets
        datasets: PathBuf,

        /// JSON file holding the partial retrieval config (defaults to the seeded form state)
        #[arg(long, value_name = "FILE")]
        partial: Option<PathBuf>,

        /// JSON file holding the previously selected datasets
        #[arg(long, value_name = "FILE")]
        original: Option<PathBuf>,

        /// Fallback rerank model provider (overrides config)
        #[arg(long, requires = "fallback_model")]
        fallback_provider: Option<String>,

        /// Fallback rerank model name (overrides config)
        #[arg(long, requires = "fallback_provider")]
        fallback_model: Option<String>,

        /// Print the resolved config as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a retrieval node before saving it
    Validate {
        /// JSON file holding the node (dataset_ids and config)
        node: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Config file to validate (defaults to current config)
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
