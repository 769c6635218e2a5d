//! CLI command handlers

pub mod ask;
pub mod config;
pub mod mcp;
pub mod prompt;
pub mod schema;
