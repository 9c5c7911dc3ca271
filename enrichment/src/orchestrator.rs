//! Retry and fallback loop around a single enrichment request.
//!
//! Models are tried in [`EnrichmentConfig::models`] order. Each model gets
//! `max_retries + 1` attempts; an attempt fails when the call errors, the
//! reply holds no JSON, or the JSON breaks the record contract. All three are
//! retried the same way. Only when every model has used its budget does the
//! caller see [`EnrichError::Exhausted`].

use std::sync::Arc;

use easyvocab_openrouter::{ChatRequest, OpenRouterClient};

use crate::backend::CompletionBackend;
use crate::backoff::{Delay, JitteredBackoff};
use crate::config::EnrichmentConfig;
use crate::error::{AttemptError, AttemptRecord, EnrichError};
use crate::extract::extract_json;
use crate::prompt::PromptBuilder;
use crate::record::LlmRecord;
use crate::word_info::EnrichedWordInfo;

/// Runs the enrichment pipeline against a completion backend.
pub struct Enricher {
    config: EnrichmentConfig,
    prompts: PromptBuilder,
    backend: Arc<dyn CompletionBackend>,
    delay: Arc<dyn Delay>,
}

impl Enricher {
    /// Creates an enricher talking to OpenRouter with jittered backoff.
    ///
    /// # Errors
    /// Returns [`EnrichError::Config`] when the configuration is invalid or
    /// the HTTP client cannot be built from it.
    pub fn new(config: EnrichmentConfig) -> Result<Self, EnrichError> {
        config.validate()?;
        let client = OpenRouterClient::new(&config.openrouter_config())
            .map_err(|e| EnrichError::Config(e.to_string()))?;
        Ok(Self::with_backend(config, Arc::new(client)))
    }

    /// Creates an enricher over any backend (fakes in tests, other gateways).
    #[must_use]
    pub fn with_backend(config: EnrichmentConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        let prompts = PromptBuilder::new(&config.translation_language);
        let delay = Arc::new(JitteredBackoff::new(config.backoff_base));
        Self {
            config,
            prompts,
            backend,
            delay,
        }
    }

    /// Replaces the wait between attempts (fluent builder pattern).
    #[must_use]
    pub fn delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    #[must_use]
    pub const fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Enriches one word or phrase.
    ///
    /// # Errors
    /// - [`EnrichError::Config`] if the configuration is unusable; nothing is sent.
    /// - [`EnrichError::Upstream`] on a failure retrying cannot fix.
    /// - [`EnrichError::Exhausted`] once every model has used its retry budget.
    pub async fn enrich(&self, word: &str) -> Result<EnrichedWordInfo, EnrichError> {
        self.config.validate()?;

        let prompt = self.prompts.build(word);
        let max_retries = self.config.max_retries;
        let mut history: Vec<AttemptRecord> = Vec::new();

        for model in self.config.models() {
            let request = prompt.to_chat_request(&model, self.config.temperature, self.config.max_tokens);

            for attempt in 0..=max_retries {
                match self.attempt(&request).await {
                    Ok(info) => {
                        tracing::debug!(
                            event = "llm_attempt_succeeded",
                            model = %model,
                            attempt = attempt + 1,
                            "llm_attempt_succeeded"
                        );
                        return Ok(info);
                    }
                    Err(AttemptError::Upstream(e)) if !e.is_transient() => {
                        tracing::error!(
                            event = "llm_request_rejected",
                            model = %model,
                            error = %e,
                            "llm_request_rejected"
                        );
                        return Err(EnrichError::Upstream(e));
                    }
                    Err(e) => {
                        tracing::warn!(
                            event = "llm_attempt_failed",
                            model = %model,
                            attempt = attempt + 1,
                            max_attempts = max_retries.saturating_add(1),
                            error = %e,
                            "llm_attempt_failed"
                        );
                        history.push(AttemptRecord {
                            model: model.clone(),
                            attempt: attempt + 1,
                            error: e.to_string(),
                        });
                    }
                }

                if attempt < max_retries {
                    self.delay.wait(attempt).await;
                }
            }

            tracing::warn!(event = "retry_budget_exhausted", model = %model, "retry_budget_exhausted");
        }

        Err(EnrichError::Exhausted {
            attempts: history.len(),
            history,
        })
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<EnrichedWordInfo, AttemptError> {
        let content = self.backend.complete(request).await?;
        let value = extract_json(&content)?;
        let record = LlmRecord::from_value(value)?;
        Ok(EnrichedWordInfo::from(record))
    }
}

/// One-shot entry point: builds a client from `config` and enriches `word`.
///
/// # Errors
/// See [`Enricher::enrich`].
pub async fn get_usage_examples(config: &EnrichmentConfig, word: &str) -> Result<EnrichedWordInfo, EnrichError> {
    Enricher::new(config.clone())?.enrich(word).await
}
