//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use easyvocab_enrichment::EnrichmentConfig;
use std::time::Duration;

/// Enrich English words and phrases with an LLM.
#[derive(Debug, Parser)]
#[command(name = "easyvocab", author, version, about, long_about = None)]
pub struct Cli {
    /// Command to run; defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enrich a word or phrase and print the record as JSON
    Enrich {
        /// The word or phrase to look up
        word: String,
        /// Model selection and retry settings
        #[command(flatten)]
        overrides: ModelOverrides,
    },
    /// Print the prompt that would be sent for a word, without calling a model
    Prompt {
        /// The word or phrase to render the prompt for
        word: String,
    },
    /// Start the MCP server over stdio (default)
    Serve {
        /// Print MCP client configuration snippets and exit
        #[arg(long)]
        print_config: bool,
        /// Model selection and retry settings
        #[command(flatten)]
        overrides: ModelOverrides,
    },
}

/// Flags layered on top of the `OPENROUTER_*` environment.
#[derive(Debug, Clone, Default, Args)]
pub struct ModelOverrides {
    /// Primary model identifier
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Fallback model, tried in order after the primary (repeatable)
    #[arg(long = "fallback", value_name = "MODEL")]
    pub fallback: Vec<String>,

    /// Retries per model before moving to the next one
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ModelOverrides {
    /// Applies every flag that was given; `--fallback` replaces the whole list.
    pub fn apply(&self, config: &mut EnrichmentConfig) {
        if let Some(model) = &self.model {
            config.model.clone_from(model);
        }
        if !self.fallback.is_empty() {
            config.fallback_models.clone_from(&self.fallback);
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
    }
}
