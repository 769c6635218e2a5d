//! nlquery Core Library
//!
//! Natural-language search over a vulnerability and component index.
//!
//! # Features
//! - Schema snapshot of the corpus field vocabulary
//! - LLM-generated Elasticsearch queries with tolerant answer parsing
//! - Result classification into component / vulnerability templates
//! - "Show all" directive versus single best hit responses

pub mod classify;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod schema;
pub mod search;

pub use classify::{ClassifiedHit, Intent, Template};
pub use config::{Config, LLMServiceConfig, SearchConfig};
pub use error::{Error, NlQueryError, Result};
pub use llm::{ChatMessage, GeneratedQuery, HttpLLMClient, LLMClient, QueryGenerator};
pub use pipeline::{Pipeline, PipelineResponse, Results};
pub use prompt::CompiledPrompt;
pub use schema::{SchemaRegistry, SchemaSnapshot};
pub use search::{ElasticsearchBackend, Hit, SearchBackend};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "nlquery";
