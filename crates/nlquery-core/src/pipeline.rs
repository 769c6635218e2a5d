//! Request pipeline: prompt -> query -> search -> classified response

use crate::classify::{classify, classify_hit, infer_intent, ClassifiedHit, Intent};
use crate::config::Config;
use crate::error::{exit_codes, NlQueryError, Result};
use crate::llm::QueryGenerator;
use crate::schema::{SchemaRegistry, SchemaSnapshot};
use crate::search::{ElasticsearchBackend, SearchBackend};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prompts that return every hit instead of the best one
pub const SHOW_ALL_PHRASES: &[&str] = &[
    "show all",
    "show all documents",
    "show all es docs",
    "show all elasticsearch documents",
];

/// Whether the prompt is a "show all" directive (trimmed, case-insensitive)
pub fn is_show_all(prompt: &str) -> bool {
    let normalized = prompt.trim().to_lowercase();
    SHOW_ALL_PHRASES.contains(&normalized.as_str())
}

/// Response payload: one hit or the whole list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Results {
    Single(ClassifiedHit),
    All(Vec<ClassifiedHit>),
}

impl Results {
    pub fn len(&self) -> usize {
        match self {
            Results::Single(_) => 1,
            Results::All(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a host returns for one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub intent: Intent,
    pub results: Option<Results>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the failure was an LLM rate limit; not part of the wire shape
    #[serde(skip)]
    rate_limited: bool,
}

impl PipelineResponse {
    pub fn success(intent: Intent, results: Option<Results>) -> Self {
        Self {
            intent,
            results,
            error: None,
            rate_limited: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            intent: Intent::Error,
            results: None,
            error: Some(message.into()),
            rate_limited: false,
        }
    }

    /// Error response for a failed generation, keeping the rate-limit kind
    pub fn from_error(error: &NlQueryError) -> Self {
        Self {
            rate_limited: error.is_rate_limited(),
            ..Self::failure(error.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        self.intent != Intent::Error
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }

    /// Process exit code a CLI host reports for this response
    pub fn exit_code(&self) -> i32 {
        if self.rate_limited {
            exit_codes::RATE_LIMITED
        } else if self.is_success() {
            exit_codes::SUCCESS
        } else {
            exit_codes::GENERAL_ERROR
        }
    }
}

/// Sequences schema lookup, prompt compilation, generation and search
pub struct Pipeline {
    registry: SchemaRegistry,
    generator: QueryGenerator,
    backend: Arc<dyn SearchBackend>,
    result_limit: usize,
}

impl Pipeline {
    pub fn new(
        generator: QueryGenerator,
        backend: Arc<dyn SearchBackend>,
        result_limit: usize,
    ) -> Self {
        Self {
            registry: SchemaRegistry::new(backend.clone()),
            generator,
            backend,
            result_limit,
        }
    }

    /// Wire the HTTP LLM client and the Elasticsearch backend from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = QueryGenerator::from_config(config.llm_service.clone())?;
        let backend: Arc<dyn SearchBackend> =
            Arc::new(ElasticsearchBackend::new(config.search.clone())?);
        Ok(Self::new(generator, backend, config.search.result_limit))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub async fn refresh_schema(&self) -> Result<SchemaSnapshot> {
        self.registry.refresh().await
    }

    /// Run one prompt end to end. Never fails; errors become an `error` response.
    pub async fn handle(&self, user_prompt: &str) -> PipelineResponse {
        tracing::info!(prompt = %user_prompt, "Handling prompt");

        let compiled = self.registry.compile_prompt().await;

        let query = match self.generator.generate(&compiled, user_prompt).await {
            Ok(query) => query,
            Err(e) => {
                if e.is_rate_limited() {
                    tracing::warn!("{}", e);
                } else {
                    tracing::error!("{}", e);
                }
                return PipelineResponse::from_error(&e);
            }
        };

        let hits = match self.backend.search(&query, self.result_limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                return PipelineResponse::failure(format!(
                    "Search backend failed: {}",
                    backend_detail(e)
                ));
            }
        };
        tracing::info!(hits = hits.len(), backend = self.backend.backend_type(), "Search complete");

        if is_show_all(user_prompt) {
            let intent = infer_intent(&hits);
            return PipelineResponse::success(intent, Some(Results::All(classify(hits))));
        }

        match hits.into_iter().next() {
            Some(best) => {
                let intent = infer_intent(std::slice::from_ref(&best));
                PipelineResponse::success(intent, Some(Results::Single(classify_hit(best))))
            }
            None => PipelineResponse::success(Intent::Package, None),
        }
    }
}

fn backend_detail(e: NlQueryError) -> String {
    match e {
        NlQueryError::Backend(detail) => detail,
        other => other.to_string(),
    }
}
