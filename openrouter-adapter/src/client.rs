//! HTTP execution of chat completion requests against OpenRouter.

use crate::error::OpenRouterError;
use crate::types::{ChatRequest, ChatResponse, ErrorEnvelope, OpenRouterConfig};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::{Duration, Instant};

/// Longest slice of an error body echoed back in [`OpenRouterError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Builds a client with the configured timeout and attribution headers.
    ///
    /// # Errors
    /// Returns [`OpenRouterError::InvalidConfig`] if a header value cannot be
    /// encoded or the underlying HTTP client fails to initialise.
    pub fn new(config: &OpenRouterConfig) -> Result<Self, OpenRouterError> {
        let headers = default_headers(config)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| OpenRouterError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends a chat completion request and returns the first choice's text.
    ///
    /// A choice whose content is `null` yields an empty string.
    ///
    /// # Errors
    /// Returns an [`OpenRouterError`] describing the transport, status or
    /// decoding failure.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, OpenRouterError> {
        let start = Instant::now();

        let response = self
            .http
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| OpenRouterError::from_reqwest(&e, self.timeout))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(OpenRouterError::RateLimited { retry_after });
        }

        let body = response
            .text()
            .await
            .map_err(|e| OpenRouterError::from_reqwest(&e, self.timeout))?;

        if !status.is_success() {
            return Err(OpenRouterError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let content = parse_completion(&body)?;

        tracing::debug!(
            event = "completion_received",
            model = %request.model,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            chars = content.chars().count(),
            "completion_received"
        );

        Ok(content)
    }
}

fn default_headers(config: &OpenRouterConfig) -> Result<HeaderMap, OpenRouterError> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|_| OpenRouterError::InvalidConfig("API key is not a valid header value".into()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    if let Some(site_url) = config.site_url.as_deref().filter(|s| !s.is_empty()) {
        let value = HeaderValue::from_str(site_url)
            .map_err(|_| OpenRouterError::InvalidConfig(format!("invalid site URL: {site_url}")))?;
        headers.insert("HTTP-Referer", value);
    }

    if let Some(title) = config.app_title.as_deref().filter(|s| !s.is_empty()) {
        let value = HeaderValue::from_str(title)
            .map_err(|_| OpenRouterError::InvalidConfig(format!("invalid app title: {title}")))?;
        headers.insert("X-Title", value);
    }

    Ok(headers)
}

/// Pulls the first choice's text out of a chat completion body.
pub(crate) fn parse_completion(body: &str) -> Result<String, OpenRouterError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| OpenRouterError::Decode(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or(OpenRouterError::EmptyResponse)
}

/// Prefers the structured `error.message`, falling back to the raw body.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        format!("{}...", trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>())
    } else {
        trimmed.to_string()
    }
}
