//! Word enrichment pipeline.
//!
//! Takes a single English word or phrase and returns a fully populated
//! [`EnrichedWordInfo`]:
//!
//! 1. [`prompt`] renders deterministic instructions and the user message.
//! 2. [`orchestrator`] sends them to each configured model in turn, retrying
//!    with [`backoff`] until one reply survives the next two steps.
//! 3. [`extract`] recovers the JSON document from the raw reply.
//! 4. [`record`] validates and normalizes it; [`word_info`] flattens it into
//!    the persistence-ready form.
//!
//! ```no_run
//! # async fn run() -> Result<(), easyvocab_enrichment::EnrichError> {
//! use easyvocab_enrichment::{get_usage_examples, EnrichmentConfig};
//!
//! let config = EnrichmentConfig::from_env()?;
//! let info = get_usage_examples(&config, "house").await?;
//! println!("{} ({}): {}", info.word, info.level, info.translation);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod backoff;
pub mod config;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod prompt;
pub mod record;
pub mod word_info;

pub use easyvocab_openrouter as openrouter;

pub use backend::CompletionBackend;
pub use backoff::{Delay, JitteredBackoff, NoDelay};
pub use config::EnrichmentConfig;
pub use error::{AttemptError, AttemptRecord, EnrichError, ValidationError};
pub use extract::extract_json;
pub use orchestrator::{get_usage_examples, Enricher};
pub use prompt::{Prompt, PromptBuilder};
pub use record::{Category, Definition, EntryType, Level, LlmRecord, Meaning};
pub use word_info::{EnrichedWordInfo, EXAMPLES_PLACEHOLDER, SYNONYMS_PLACEHOLDER};
