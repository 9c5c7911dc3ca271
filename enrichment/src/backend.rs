//! The seam between the retry loop and the chat completion transport.

use async_trait::async_trait;
use easyvocab_openrouter::{ChatRequest, OpenRouterClient, OpenRouterError};

/// Anything that can turn a chat request into the model's raw text reply.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, OpenRouterError>;
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, OpenRouterError> {
        self.chat(request).await
    }
}
