//! Configuration management

use crate::error::{NlQueryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the LLM credential
pub const API_KEY_ENV: &str = "NLQUERY_LLM_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Search backend configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// LLM service configuration for query generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of an OpenAI-compatible service, including its version prefix
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key (required before any generation call)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_chat_model(),
            api_key: env_non_empty(API_KEY_ENV),
            timeout_secs: default_timeout(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("NLQUERY_LLM_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta/openai".to_string())
}

fn default_chat_model() -> String {
    std::env::var("NLQUERY_LLM_MODEL").unwrap_or_else(|_| "gemini-1.5-pro-latest".to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1024
}

/// Elasticsearch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch REST API
    #[serde(default = "default_es_url")]
    pub url: String,

    /// Index holding vulnerability and component records
    #[serde(default = "default_index")]
    pub index: String,

    /// Index holding the single schema snapshot document
    #[serde(default = "default_schema_index")]
    pub schema_index: String,

    /// Maximum number of hits requested per query
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Page size used when scanning the whole index
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            index: default_index(),
            schema_index: default_schema_index(),
            result_limit: default_result_limit(),
            scan_page_size: default_scan_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_es_url() -> String {
    std::env::var("NLQUERY_ES_URL").unwrap_or_else(|_| "http://localhost:9200".to_string())
}

fn default_index() -> String {
    std::env::var("NLQUERY_ES_INDEX").unwrap_or_else(|_| "nlp_index".to_string())
}

fn default_schema_index() -> String {
    std::env::var("NLQUERY_SCHEMA_INDEX").unwrap_or_else(|_| "schema-index".to_string())
}

fn default_result_limit() -> usize {
    std::env::var("NLQUERY_RESULT_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100)
}

fn default_scan_page_size() -> usize {
    500
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a specific path, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };

        // Keys never have to live on disk
        if let Some(key) = env_non_empty(API_KEY_ENV) {
            config.llm_service.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        validate_http_url("llm_service.url", &self.llm_service.url)?;
        validate_http_url("search.url", &self.search.url)?;

        if self.search.result_limit == 0 {
            return Err(NlQueryError::Config(
                "search.result_limit must be > 0".to_string(),
            ));
        }
        if self.search.scan_page_size == 0 {
            return Err(NlQueryError::Config(
                "search.scan_page_size must be > 0".to_string(),
            ));
        }
        if self.search.index.trim().is_empty() || self.search.schema_index.trim().is_empty() {
            return Err(NlQueryError::Config(
                "search.index and search.schema_index must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// YAML rendering with the API key masked
    pub fn to_yaml_redacted(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.llm_service.api_key.is_some() {
            shown.llm_service.api_key = Some("********".to_string());
        }
        Ok(serde_yaml::to_string(&shown)?)
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(NlQueryError::Config(format!(
            "{} must start with http:// or https://, got '{}'",
            field, value
        )))
    }
}
