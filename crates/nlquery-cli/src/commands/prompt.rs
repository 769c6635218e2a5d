//! Prompt preview command

use crate::app::PromptArgs;
use anyhow::Result;
use nlquery_core::{Config, ElasticsearchBackend, SchemaRegistry};
use std::sync::Arc;

pub async fn run(args: PromptArgs, config: &Config) -> Result<()> {
    let backend = ElasticsearchBackend::new(config.search.clone())?;
    let registry = SchemaRegistry::new(Arc::new(backend));

    println!("{}", registry.compile_prompt().await.framed(&args.text()));
    Ok(())
}
