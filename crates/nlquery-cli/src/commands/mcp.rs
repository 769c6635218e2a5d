//! MCP server command

use anyhow::Result;
use nlquery_core::{Config, Pipeline};
use std::sync::Arc;

pub async fn run(config: &Config) -> Result<()> {
    let pipeline = Arc::new(Pipeline::from_config(config)?);
    nlquery_mcp::start_server(pipeline).await
}
