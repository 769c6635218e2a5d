//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use nlquery_core::{PipelineResponse, SchemaSnapshot};

/// Format a pipeline response
pub fn format_response(response: &PipelineResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_response(response),
        OutputFormat::Cli => terminal::format_response(response),
    }
}

/// Format the live schema snapshot, `None` meaning the fallback vocabulary applies
pub fn format_schema(snapshot: Option<&SchemaSnapshot>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_schema(snapshot),
        OutputFormat::Cli => terminal::format_schema(snapshot),
    }
}
