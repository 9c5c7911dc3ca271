//! MCP server for EasyVocab.
//!
//! Wraps the enrichment pipeline in a Rig tool (`add_word`) and serves it to
//! MCP clients over stdio.

pub mod server;
pub mod tools;

/// Common types for building and running the server.
pub mod prelude {
    pub use crate::server::{McpConfig, SERVER_NAME, VocabMcpHandler};
    pub use crate::tools::{AddWordArgs, AddWordTool, ToolError};
}
