//! Search backend abstraction
//!
//! The pipeline talks to the document index through [`SearchBackend`]:
//! - executing a generated query with a result cap
//! - reading and replacing the single schema snapshot
//! - scanning every document for schema population
//!
//! [`ElasticsearchBackend`] is the REST implementation.

mod elasticsearch;

pub use elasticsearch::ElasticsearchBackend;

use crate::error::Result;
use crate::llm::GeneratedQuery;
use crate::schema::SchemaSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Search backend trait - the document index the pipeline queries
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend identifier (e.g., "elasticsearch")
    fn backend_type(&self) -> &'static str;

    /// Execute a query, returning at most `size` hits in backend rank order
    async fn search(&self, query: &GeneratedQuery, size: usize) -> Result<Vec<Hit>>;

    /// Read the live schema snapshot, `None` when it has never been written
    async fn load_schema(&self) -> Result<Option<SchemaSnapshot>>;

    /// Replace the live schema snapshot
    async fn store_schema(&self, snapshot: &SchemaSnapshot) -> Result<()>;

    /// Feed the `_source` of every document in the data index to `visit`,
    /// returning the number of documents visited
    async fn scan_documents(&self, visit: &mut (dyn for<'v> FnMut(&'v Value) + Send)) -> Result<usize>;
}

/// Raw hit returned by the backend.
///
/// Only `_source.type` is interpreted; every other field the backend sends
/// (`_index`, `_id`, `_score`, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source", default)]
    pub source: Value,

    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl Hit {
    /// Create a hit carrying only a source document
    pub fn from_source(source: Value) -> Self {
        Self {
            source,
            meta: Map::new(),
        }
    }

    /// Add backend metadata (e.g., `_id`) to the hit
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    /// Record discriminator (`_source.type`)
    pub fn doc_type(&self) -> Option<&str> {
        self.source.get("type").and_then(Value::as_str)
    }

    /// Backend document id, when present
    pub fn id(&self) -> Option<&str> {
        self.meta.get("_id").and_then(Value::as_str)
    }
}
