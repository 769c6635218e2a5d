//! JSON output formatter

use nlquery_core::{PipelineResponse, SchemaSnapshot};

pub fn format_response(response: &PipelineResponse) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_schema(snapshot: Option<&SchemaSnapshot>) -> String {
    serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "null".to_string()) + "\n"
}
