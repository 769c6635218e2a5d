//! MCP tool definitions and handlers

use crate::protocol::*;
use anyhow::Result;
use nlquery_core::Pipeline;
use serde_json::Value;

pub fn nlp_query_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "nlp_query".to_string(),
        description: "Ask about vulnerabilities (CVEs) and software components in plain language. \
                      Say \"show all\" to list every matching record instead of the best one."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Natural language question, e.g. \"show me CVE-2021-44228\""
                }
            },
            "required": ["prompt"]
        }),
    }
}

pub fn schema_status_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "schema_status".to_string(),
        description: "Show the field vocabulary used to build queries".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn schema_refresh_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "schema_refresh".to_string(),
        description: "Rescan the index and replace the field vocabulary".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub async fn handle_nlp_query(pipeline: &Pipeline, args: Value) -> Result<ToolResult> {
    let prompt = args
        .get("prompt")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: prompt"))?;

    let response = pipeline.handle(prompt).await;

    let summary = match (&response.error, &response.results) {
        (Some(error), _) if response.is_rate_limited() => {
            format!("Rate limited, retry later: {}", error)
        }
        (Some(error), _) => format!("Error: {}", error),
        (None, None) => format!("intent: {}, no matching records", response.intent),
        (None, Some(results)) => format!(
            "intent: {}, {} record(s)",
            response.intent,
            results.len()
        ),
    };

    Ok(ToolResult::structured(
        summary,
        serde_json::to_value(&response)?,
        !response.is_success(),
    ))
}

pub async fn handle_schema_status(pipeline: &Pipeline) -> Result<ToolResult> {
    let snapshot = pipeline.registry().latest().await;

    let summary = match &snapshot {
        Some(s) => format!("{} fields from {} documents", s.fields.len(), s.doc_count),
        None => "No schema snapshot stored; default field list in use".to_string(),
    };

    Ok(ToolResult::structured(
        summary,
        serde_json::json!({ "snapshot": snapshot }),
        false,
    ))
}

pub async fn handle_schema_refresh(pipeline: &Pipeline) -> Result<ToolResult> {
    let snapshot = pipeline.refresh_schema().await?;

    Ok(ToolResult::structured(
        format!(
            "Schema refreshed: {} fields from {} documents",
            snapshot.fields.len(),
            snapshot.doc_count
        ),
        serde_json::to_value(&snapshot)?,
        false,
    ))
}
