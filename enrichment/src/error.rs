//! Error taxonomy for the enrichment pipeline.
//!
//! Three layers:
//! - [`ValidationError`]: a parsed payload broke the record contract.
//! - [`AttemptError`]: one model call failed; usually retried.
//! - [`EnrichError`]: what the caller finally sees.

use easyvocab_openrouter::OpenRouterError;
use thiserror::Error;

/// The model answered with JSON that does not satisfy the record contract.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("response does not match the record shape: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("word must not be empty")]
    EmptyWord,

    #[error("invalid CEFR level: {0:?}")]
    InvalidLevel(String),

    #[error("invalid entry type: {0:?}")]
    InvalidType(String),

    #[error("frequency out of expected range 1-10: {0}")]
    FrequencyOutOfRange(i64),

    #[error("rank must be positive: {0}")]
    NonPositiveRank(i64),

    #[error("definition text must not be empty (meaning {meaning}, definition {definition})")]
    EmptyDefinition { meaning: usize, definition: usize },
}

/// Failure of a single model attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Upstream(#[from] OpenRouterError),

    #[error("malformed JSON in model response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model response failed validation: {0}")]
    Validation(#[from] ValidationError),
}

impl AttemptError {
    /// Decode and validation failures are always worth another attempt;
    /// upstream failures defer to [`OpenRouterError::is_transient`].
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Upstream(e) => e.is_transient(),
            Self::Json(_) | Self::Validation(_) => true,
        }
    }
}

/// Record of a single failed attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Model identifier the attempt was sent to.
    pub model: String,
    /// The attempt number for this model (1-indexed).
    pub attempt: u32,
    /// Rendered error text.
    pub error: String,
}

/// Errors surfaced by [`crate::Enricher::enrich`] and [`crate::get_usage_examples`].
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Every model exhausted its retry budget. Carries no partial record.
    #[error("LLM request failed after retries")]
    Exhausted {
        /// Number of attempts made across all models.
        attempts: usize,
        /// One entry per failed attempt, in order.
        history: Vec<AttemptRecord>,
    },

    /// Static configuration is unusable (e.g. no model configured).
    #[error("Invalid enrichment configuration: {0}")]
    Config(String),

    /// The upstream client reported a failure that retrying cannot fix.
    #[error("LLM request failed permanently: {0}")]
    Upstream(#[source] OpenRouterError),
}

impl EnrichError {
    /// HTTP status a web caller should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Exhausted { .. } => 502,
            Self::Config(_) | Self::Upstream(_) => 500,
        }
    }

    /// Whether this is the gateway-type "upstream unavailable" failure.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}
