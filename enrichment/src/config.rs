//! Configuration for the enrichment pipeline.

use crate::error::EnrichError;
use easyvocab_openrouter::{OpenRouterConfig, DEFAULT_BASE_URL};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_FALLBACK_MODEL: &str = "google/gemini-2.5-pro";

/// Everything the pipeline needs, passed explicitly into its entry point.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub api_key: String,
    pub base_url: String,
    /// Primary model identifier, always tried first.
    pub model: String,
    /// Tried in order after the primary; duplicates are skipped.
    pub fallback_models: Vec<String>,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Retries per model; each model gets `max_retries + 1` attempts.
    pub max_retries: u32,
    pub temperature: f32,
    pub max_tokens: u32,
    /// First backoff interval; doubles per attempt.
    pub backoff_base: Duration,
    /// Language the model translates into.
    pub translation_language: String,
    pub site_url: Option<String>,
    pub app_title: Option<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: "unknown".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            fallback_models: vec![DEFAULT_FALLBACK_MODEL.to_string()],
            timeout: Duration::from_secs(20),
            max_retries: 2,
            temperature: 0.1,
            max_tokens: 4000,
            backoff_base: Duration::from_millis(500),
            translation_language: "Ukrainian".to_string(),
            site_url: None,
            app_title: Some("EasyVocab".to_string()),
        }
    }
}

impl EnrichmentConfig {
    /// Loads configuration from `OPENROUTER_*` environment variables.
    ///
    /// # Errors
    /// Returns [`EnrichError::Config`] if a numeric variable cannot be parsed
    /// or the fallback list is malformed.
    pub fn from_env() -> Result<Self, EnrichError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    /// See [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnrichError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENROUTER_API_KEY") {
            config.api_key = key;
        }
        if let Some(url) = get("OPENROUTER_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = get("OPENROUTER_MODEL") {
            config.model = model.trim().to_string();
        }
        if let Some(raw) = lookup("OPENROUTER_FALLBACK_MODELS") {
            config.fallback_models = parse_model_list(&raw)?;
        }
        if let Some(raw) = get("OPENROUTER_TIMEOUT_SECONDS") {
            config.timeout = Duration::from_secs(parse_number("OPENROUTER_TIMEOUT_SECONDS", &raw)?);
        }
        if let Some(raw) = get("OPENROUTER_MAX_RETRIES") {
            config.max_retries = parse_number("OPENROUTER_MAX_RETRIES", &raw)?;
        }
        if let Some(url) = get("OPENROUTER_SITE_URL") {
            config.site_url = Some(url);
        }
        if let Some(title) = get("OPENROUTER_APP_TITLE") {
            config.app_title = Some(title);
        }

        Ok(config)
    }

    /// Primary model followed by fallbacks, deduplicated, blanks skipped.
    #[must_use]
    pub fn models(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::with_capacity(1 + self.fallback_models.len());
        for model in std::iter::once(&self.model).chain(&self.fallback_models) {
            let model = model.trim();
            if !model.is_empty() && !models.iter().any(|m| m == model) {
                models.push(model.to_string());
            }
        }
        models
    }

    /// # Errors
    /// Returns [`EnrichError::Config`] when no primary model is set.
    pub fn validate(&self) -> Result<(), EnrichError> {
        if self.model.trim().is_empty() {
            return Err(EnrichError::Config("primary model identifier is empty".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn openrouter_config(&self) -> OpenRouterConfig {
        OpenRouterConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            site_url: self.site_url.clone(),
            app_title: self.app_title.clone(),
        }
    }
}

/// Accepts a JSON array (`["a", "b"]`) or a comma-separated list.
fn parse_model_list(raw: &str) -> Result<Vec<String>, EnrichError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let models: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
            EnrichError::Config(format!("OPENROUTER_FALLBACK_MODELS is not a JSON list: {e}"))
        })?;
        return Ok(models.into_iter().map(|m| m.trim().to_string()).filter(|m| !m.is_empty()).collect());
    }
    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
        .collect())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, EnrichError> {
    raw.trim()
        .parse()
        .map_err(|_| EnrichError::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = EnrichmentConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.fallback_models, vec![DEFAULT_FALLBACK_MODEL]);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_tokens, 4000);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_env_overrides() {
        let config = EnrichmentConfig::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-or-123"),
            ("OPENROUTER_MODEL", "openai/gpt-4o-mini"),
            ("OPENROUTER_FALLBACK_MODELS", r#"["anthropic/claude-3.5-haiku", "google/gemini-2.5-pro"]"#),
            ("OPENROUTER_TIMEOUT_SECONDS", "45"),
            ("OPENROUTER_MAX_RETRIES", "0"),
            ("OPENROUTER_APP_TITLE", "Vocab"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "sk-or-123");
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(
            config.fallback_models,
            vec!["anthropic/claude-3.5-haiku", "google/gemini-2.5-pro"]
        );
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.app_title.as_deref(), Some("Vocab"));
    }

    #[test]
    fn test_comma_separated_and_empty_fallbacks() {
        let config =
            EnrichmentConfig::from_lookup(lookup(&[("OPENROUTER_FALLBACK_MODELS", " a/b , ,c/d ")])).unwrap();
        assert_eq!(config.fallback_models, vec!["a/b", "c/d"]);

        let config = EnrichmentConfig::from_lookup(lookup(&[("OPENROUTER_FALLBACK_MODELS", "")])).unwrap();
        assert!(config.fallback_models.is_empty());
    }

    #[test]
    fn test_bad_numbers_are_config_errors() {
        let err = EnrichmentConfig::from_lookup(lookup(&[("OPENROUTER_MAX_RETRIES", "-1")])).unwrap_err();
        assert!(matches!(err, EnrichError::Config(ref m) if m.contains("OPENROUTER_MAX_RETRIES")));

        let err = EnrichmentConfig::from_lookup(lookup(&[("OPENROUTER_FALLBACK_MODELS", "[broken")])).unwrap_err();
        assert!(matches!(err, EnrichError::Config(_)));
    }

    #[test]
    fn test_models_deduplicated_primary_first() {
        let config = EnrichmentConfig {
            model: "m/primary".to_string(),
            fallback_models: vec![
                "m/fallback".to_string(),
                "m/primary".to_string(),
                " ".to_string(),
                "m/fallback".to_string(),
                "m/other".to_string(),
            ],
            ..EnrichmentConfig::default()
        };
        assert_eq!(config.models(), vec!["m/primary", "m/fallback", "m/other"]);
    }

    #[test]
    fn test_blank_primary_model_is_rejected() {
        let config = EnrichmentConfig {
            model: "  ".to_string(),
            ..EnrichmentConfig::default()
        };
        assert!(matches!(config.validate(), Err(EnrichError::Config(_))));
    }
}
