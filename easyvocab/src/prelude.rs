//! Common imports for easyvocab usage.
//!
//! ```
//! use easyvocab::prelude::*;
//! ```

// CLI surface
pub use crate::cli::{Cli, Command, ModelOverrides};
pub use crate::errors::AppError;

// Pipeline entry points and records
pub use easyvocab_enrichment::{
    get_usage_examples, Category, EnrichError, EnrichedWordInfo, Enricher, EnrichmentConfig, EntryType, Level,
};

// MCP server
pub use easyvocab_mcp::prelude::{AddWordTool, VocabMcpHandler};
