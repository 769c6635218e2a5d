//! Schema snapshot commands

use crate::app::{OutputFormat, SchemaAction, SchemaArgs};
use crate::output;
use anyhow::Result;
use nlquery_core::{Config, ElasticsearchBackend, SchemaRegistry};
use std::sync::Arc;

pub async fn run(args: SchemaArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let backend = ElasticsearchBackend::new(config.search.clone())?;
    let registry = SchemaRegistry::new(Arc::new(backend));

    match args.action {
        SchemaAction::Show => {
            let snapshot = registry.latest().await;
            print!("{}", output::format_schema(snapshot.as_ref(), format));
        }
        SchemaAction::Refresh => {
            let snapshot = registry.refresh().await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                OutputFormat::Cli => {
                    println!(
                        "Schema refreshed: {} fields from {} documents",
                        snapshot.fields.len(),
                        snapshot.doc_count
                    );
                }
            }
        }
    }
    Ok(())
}
