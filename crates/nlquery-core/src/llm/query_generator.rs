//! Query generation: natural language prompt to Elasticsearch query

use super::{ChatMessage, LLMClient};
use crate::config::LLMServiceConfig;
use crate::error::{NlQueryError, Result};
use crate::prompt::CompiledPrompt;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Top-level keys accepted as a bare query clause
pub const CLAUSE_KEYWORDS: &[&str] = &["match", "multi_match", "bool", "match_all"];

/// Structured query whose top level is always `{"query": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GeneratedQuery(Map<String, Value>);

impl GeneratedQuery {
    /// Accept a decoded model answer.
    ///
    /// Objects holding `query` are kept as-is; bare clauses are wrapped.
    pub fn from_decoded(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };

        if map.contains_key("query") {
            return Some(Self(map));
        }

        if CLAUSE_KEYWORDS.iter().any(|k| map.contains_key(*k)) {
            let mut wrapped = Map::new();
            wrapped.insert("query".to_string(), Value::Object(map));
            return Some(Self(wrapped));
        }

        None
    }

    /// Query that returns every document
    pub fn match_all() -> Self {
        let mut wrapped = Map::new();
        wrapped.insert("query".to_string(), serde_json::json!({ "match_all": {} }));
        Self(wrapped)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Request body for `_search` with the hit cap applied
    pub fn to_search_body(&self, size: usize) -> Value {
        let mut body = self.0.clone();
        body.insert("size".to_string(), Value::from(size));
        Value::Object(body)
    }
}

/// Extract a query from free-form model text.
///
/// The greedy span from the first `{` to the last `}` is tried first. When
/// it does not decode, a string-aware balanced scan is used and accepted
/// only if it finds exactly one top-level object.
pub fn parse_llm_response(response: &str) -> Option<GeneratedQuery> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }

    let decoded = match serde_json::from_str::<Value>(&response[start..=end]) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Greedy JSON span did not decode: {}", e);
            let spans = balanced_objects(response);
            if spans.len() != 1 {
                tracing::debug!(candidates = spans.len(), "Ambiguous model answer");
                return None;
            }
            serde_json::from_str(spans[0]).ok()?
        }
    };

    GeneratedQuery::from_decoded(decoded)
}

/// Top-level `{...}` spans, skipping braces inside JSON string literals
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    spans
}

/// Turns a compiled prompt plus user text into a [`GeneratedQuery`]
pub struct QueryGenerator {
    client: Arc<dyn LLMClient>,
}

impl QueryGenerator {
    /// Create from LLM client
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Create from configuration
    pub fn from_config(config: LLMServiceConfig) -> Result<Self> {
        let client = super::HttpLLMClient::new(config)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub async fn generate(
        &self,
        compiled: &CompiledPrompt,
        user_prompt: &str,
    ) -> Result<GeneratedQuery> {
        let framed = compiled.framed(user_prompt);
        tracing::debug!(model = self.client.model_name(), prompt = %framed, "Sending prompt");

        let response = self
            .client
            .chat_completion(vec![ChatMessage::user(framed)])
            .await?;
        tracing::debug!(raw = %response, "Model answer");

        let query = parse_llm_response(&response).ok_or_else(|| {
            NlQueryError::QueryGeneration("LLM did not return a valid Elasticsearch query".to_string())
        })?;

        let clause = query.as_map().get("query").cloned().unwrap_or_default();
        tracing::info!(query = %clause, "Generated query");
        Ok(query)
    }
}
