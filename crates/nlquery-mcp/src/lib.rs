//! nlquery MCP Server
//!
//! Model Context Protocol server exposing natural language search to AI assistants.

pub mod protocol;
mod server;
pub mod tools;

pub use server::{start_server, McpServer};
