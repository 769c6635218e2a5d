//! Elasticsearch REST backend

use super::{Hit, SearchBackend};
use crate::config::SearchConfig;
use crate::error::{NlQueryError, Result};
use crate::llm::GeneratedQuery;
use crate::schema::{SchemaSnapshot, SCHEMA_SNAPSHOT_ID};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const SCROLL_KEEP_ALIVE: &str = "1m";

/// Elasticsearch backend over the plain REST API
pub struct ElasticsearchBackend {
    http_client: reqwest::Client,
    config: SearchConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<SchemaSnapshot>,
}

impl ElasticsearchBackend {
    /// Create a backend from configuration
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn schema_doc_path(&self) -> String {
        format!("{}/_doc/{}", self.config.schema_index, SCHEMA_SNAPSHOT_ID)
    }

    async fn post_search(&self, url: &str, body: &Value) -> Result<SearchResponse> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(backend_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NlQueryError::Backend(format!(
                "search failed (HTTP {}): {}",
                status, body
            )));
        }

        response.json().await.map_err(backend_error)
    }

    async fn clear_scroll(&self, scroll_id: &str) {
        let result = self
            .http_client
            .delete(self.endpoint("_search/scroll"))
            .json(&json!({ "scroll_id": scroll_id }))
            .send()
            .await;

        if let Err(e) = result {
            tracing::debug!("Failed to clear scroll context: {}", e);
        }
    }
}

fn backend_error(e: reqwest::Error) -> NlQueryError {
    NlQueryError::Backend(e.to_string())
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    fn backend_type(&self) -> &'static str {
        "elasticsearch"
    }

    async fn search(&self, query: &GeneratedQuery, size: usize) -> Result<Vec<Hit>> {
        let url = self.endpoint(&format!("{}/_search", self.config.index));
        let body = query.to_search_body(size);

        tracing::debug!(index = %self.config.index, size, "Executing search");
        let response = self.post_search(&url, &body).await?;
        Ok(response.hits.hits)
    }

    async fn load_schema(&self) -> Result<Option<SchemaSnapshot>> {
        let response = self
            .http_client
            .get(self.endpoint(&self.schema_doc_path()))
            .send()
            .await
            .map_err(backend_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NlQueryError::Backend(format!(
                "schema read failed (HTTP {}): {}",
                status, body
            )));
        }

        let doc: GetResponse = response.json().await.map_err(backend_error)?;
        Ok(if doc.found { doc.source } else { None })
    }

    async fn store_schema(&self, snapshot: &SchemaSnapshot) -> Result<()> {
        let url = format!("{}?refresh=true", self.endpoint(&self.schema_doc_path()));
        let response = self
            .http_client
            .put(url)
            .json(snapshot)
            .send()
            .await
            .map_err(backend_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NlQueryError::Backend(format!(
                "schema write failed (HTTP {}): {}",
                status, body
            )));
        }
        Ok(())
    }

    async fn scan_documents(&self, visit: &mut (dyn for<'v> FnMut(&'v Value) + Send)) -> Result<usize> {
        let first_url = self.endpoint(&format!(
            "{}/_search?scroll={}",
            self.config.index, SCROLL_KEEP_ALIVE
        ));
        let first_body = json!({
            "size": self.config.scan_page_size,
            "query": { "match_all": {} },
            "sort": ["_doc"]
        });

        let mut page = self.post_search(&first_url, &first_body).await?;
        let mut open_scroll: Option<String> = None;
        let mut count = 0;

        let outcome = loop {
            if let Some(id) = page.scroll_id.take() {
                open_scroll = Some(id);
            }
            if page.hits.hits.is_empty() {
                break Ok(());
            }

            for hit in &page.hits.hits {
                visit(&hit.source);
            }
            count += page.hits.hits.len();

            let Some(id) = open_scroll.as_deref() else {
                break Ok(());
            };
            let body = json!({ "scroll": SCROLL_KEEP_ALIVE, "scroll_id": id });
            match self
                .post_search(&self.endpoint("_search/scroll"), &body)
                .await
            {
                Ok(next) => page = next,
                Err(e) => break Err(e),
            }
        };

        if let Some(id) = open_scroll {
            self.clear_scroll(&id).await;
        }
        outcome?;

        tracing::info!(index = %self.config.index, count, "Scanned documents");
        Ok(count)
    }
}
