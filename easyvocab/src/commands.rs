//! What each subcommand does.

use crate::cli::ModelOverrides;
use crate::errors::AppError;
use easyvocab_enrichment::{Enricher, EnrichmentConfig, PromptBuilder};
use easyvocab_mcp::prelude::VocabMcpHandler;
use std::sync::Arc;

/// Reads `OPENROUTER_*` variables and applies flag overrides.
///
/// # Errors
/// Returns [`AppError::Config`] when a variable is malformed or the result
/// has no primary model.
pub fn load_config(overrides: &ModelOverrides) -> Result<EnrichmentConfig, AppError> {
    let mut config = EnrichmentConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
    overrides.apply(&mut config);
    config.validate().map_err(|e| AppError::Config(e.to_string()))?;
    Ok(config)
}

/// Enriches `word` and renders the record as pretty JSON.
///
/// # Errors
/// Returns [`AppError::Enrich`] once every model has failed.
pub async fn enrich(config: EnrichmentConfig, word: &str) -> Result<String, AppError> {
    let enricher = Enricher::new(config)?;
    let info = enricher.enrich(word).await?;
    Ok(serde_json::to_string_pretty(&info)?)
}

/// The full prompt text for `word`, as a single-prompt model would receive it.
#[must_use]
pub fn render_prompt(config: &EnrichmentConfig, word: &str) -> String {
    PromptBuilder::new(&config.translation_language).build(word).render()
}

/// Builds the MCP handler serving `add_word`.
///
/// # Errors
/// Returns [`AppError::Enrich`] for an unusable configuration and
/// [`AppError::Server`] if the tool set cannot describe its tools.
pub async fn build_server(config: EnrichmentConfig) -> Result<VocabMcpHandler, AppError> {
    let enricher = Arc::new(Enricher::new(config)?);
    VocabMcpHandler::for_enricher(enricher)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

/// Client configuration snippets for registering this binary.
///
/// # Errors
/// Returns [`AppError::Io`] if the executable path is unknown.
pub fn client_config_snippets(handler: &VocabMcpHandler) -> Result<String, AppError> {
    let config = handler.client_config()?;
    Ok(format!(
        "# JSON (mcpServers)\n{}\n\n# TOML\n{}",
        serde_json::to_string_pretty(&config.to_mcp_servers_json())?,
        config.to_toml()
    ))
}

/// Serves MCP over stdio until the client disconnects.
///
/// # Errors
/// Returns [`AppError::Server`] if the transport fails.
pub async fn serve(handler: VocabMcpHandler) -> Result<(), AppError> {
    handler
        .serve_stdio()
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}
