//! # easyvocab
//!
//! Turns a bare English word or phrase into a vocabulary card: CEFR level,
//! frequency rank, translation, category, synonyms and usage examples.
//!
//! The heavy lifting lives in `easyvocab-enrichment`; this crate wires it to
//! a command line and to the `easyvocab-mcp` server.
//!
//! ## Example
//!
//! ```no_run
//! # use easyvocab::prelude::*;
//! # async fn example() -> Result<(), AppError> {
//! let config = EnrichmentConfig::from_env()?;
//! let info = get_usage_examples(&config, "house").await?;
//! assert_eq!(info.word, "house");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// Command-line definitions.
pub mod cli;

/// Subcommand implementations.
pub mod commands;

/// Public error types.
pub mod errors;

/// Commonly used types.
pub mod prelude;
