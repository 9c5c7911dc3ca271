//! Thin client for OpenRouter's OpenAI-compatible `/chat/completions` API.
//!
//! One [`OpenRouterClient`] wraps a configured `reqwest` client; every call
//! maps transport and protocol failures onto [`OpenRouterError`] so callers
//! can decide what to retry.

pub mod client;
pub mod error;
pub mod types;

pub use client::OpenRouterClient;
pub use error::OpenRouterError;
pub use types::*;
