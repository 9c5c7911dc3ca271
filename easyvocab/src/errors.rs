//! Public error types for the easyvocab binary.

use easyvocab_enrichment::EnrichError;
use thiserror::Error;

/// Errors surfaced to the person running `easyvocab`.
///
/// Display messages are what the user sees; the wrapped error keeps the
/// full chain for logs.
#[derive(Debug, Error)]
pub enum AppError {
    /// The pipeline could not produce a record for the word.
    #[error("could not enrich word: {0}")]
    Enrich(#[from] EnrichError),

    /// Environment or flags do not form a usable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The MCP server failed to start or lost its connection.
    #[error("MCP server error: {0}")]
    Server(String),

    /// The record could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
