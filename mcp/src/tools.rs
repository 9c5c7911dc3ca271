//! Rig tools backed by the enrichment pipeline.

use easyvocab_enrichment::{EnrichError, EnrichedWordInfo, Enricher, EnrichmentConfig};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Error type for vocabulary tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The caller sent arguments the tool cannot act on.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    /// The pipeline gave up on the word.
    #[error("Could not enrich word: {0}")]
    Enrichment(#[from] EnrichError),
}

/// Arguments for the `add_word` tool.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct AddWordArgs {
    /// The English word or phrase to enrich
    pub word: String,
}

/// Enriches a word or phrase and returns the full vocabulary record.
///
/// The record is returned to the MCP client rather than stored; persistence
/// belongs to whoever called the tool.
#[derive(Clone)]
pub struct AddWordTool {
    enricher: Arc<Enricher>,
}

impl AddWordTool {
    /// Wraps an existing enricher, sharing its HTTP connection pool.
    #[must_use]
    pub const fn new(enricher: Arc<Enricher>) -> Self {
        Self { enricher }
    }

    /// Builds an OpenRouter-backed enricher from `config`.
    ///
    /// # Errors
    /// Returns [`EnrichError::Config`] if the configuration is unusable.
    pub fn from_config(config: EnrichmentConfig) -> Result<Self, EnrichError> {
        Ok(Self::new(Arc::new(Enricher::new(config)?)))
    }
}

impl Tool for AddWordTool {
    const NAME: &'static str = "add_word";
    type Error = ToolError;
    type Args = AddWordArgs;
    type Output = EnrichedWordInfo;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Look up an English word or phrase and return its CEFR level, frequency rank, \
                          translation, category, synonyms and usage examples."
                .to_string(),
            parameters: serde_json::to_value(schemars::schema_for!(AddWordArgs))
                .unwrap_or_else(|_| serde_json::json!({})),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let word = args.word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ToolError::InvalidArguments("word must not be empty".to_string()));
        }

        tracing::info!(event = "add_word", word = %word, "add_word");
        match self.enricher.enrich(&word).await {
            Ok(info) => Ok(info),
            Err(e) => {
                tracing::error!(
                    event = "add_word_failed",
                    word = %word,
                    status = e.status_code(),
                    error = %e,
                    "add_word_failed"
                );
                Err(e.into())
            }
        }
    }
}
