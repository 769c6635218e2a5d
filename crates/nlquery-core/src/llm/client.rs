//! HTTP client for OpenAI-compatible chat completion services

use crate::config::LLMServiceConfig;
use crate::error::{NlQueryError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-compatible client (Gemini's OpenAI endpoint, vLLM, OpenAI, ...)
pub struct HttpLLMClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
}

impl HttpLLMClient {
    /// Create client from configuration. Fails without an API key.
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        require_api_key(&config)?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

fn require_api_key(config: &LLMServiceConfig) -> Result<&str> {
    config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            NlQueryError::Config(format!(
                "LLM API key not configured (set {} or llm_service.api_key)",
                crate::config::API_KEY_ENV
            ))
        })
}

/// Map a non-success LLM answer onto the error taxonomy
fn classify_failure(status: StatusCode, body: &str) -> NlQueryError {
    if is_rate_limit(status, body) {
        NlQueryError::RateLimited(body.trim().to_string())
    } else {
        NlQueryError::QueryGeneration(format!("LLM service error (HTTP {}): {}", status, body))
    }
}

fn is_rate_limit(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    let lower = body.to_ascii_lowercase();
    body.contains("RESOURCE_EXHAUSTED") || lower.contains("rate limit") || lower.contains("rate-limit")
}

#[async_trait]
impl LLMClient for HttpLLMClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let api_key = require_api_key(&self.config)?;

        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.url.trim_end_matches('/')
        );

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("LLM request failed: {}", e);
                NlQueryError::QueryGeneration(format!("LLM request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "LLM service returned an error");
            return Err(classify_failure(status, &body));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            NlQueryError::QueryGeneration(format!("Unreadable LLM response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| NlQueryError::QueryGeneration("No response from LLM".to_string()))?
            .message
            .content;

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> LLMServiceConfig {
        LLMServiceConfig {
            api_key: key.map(str::to_string),
            ..LLMServiceConfig::default()
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = HttpLLMClient::new(config_with_key(None)).err().unwrap();
        assert!(matches!(err, NlQueryError::Config(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_blank_key_is_config_error() {
        assert!(HttpLLMClient::new(config_with_key(Some("   "))).is_err());
    }

    #[test]
    fn test_client_reports_model() {
        let mut config = config_with_key(Some("k"));
        config.model = "gemini-1.5-pro-latest".to_string();
        let client = HttpLLMClient::new(config).unwrap();
        assert_eq!(client.model_name(), "gemini-1.5-pro-latest");
    }

    #[test]
    fn test_429_is_rate_limit() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "LLM rate-limit exceeded: slow down");
    }

    #[test]
    fn test_resource_exhausted_body_is_rate_limit() {
        let body = r#"{"error": {"code": 400, "status": "RESOURCE_EXHAUSTED"}}"#;
        assert!(classify_failure(StatusCode::BAD_REQUEST, body).is_rate_limited());
    }

    #[test]
    fn test_other_failures_are_generic() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, NlQueryError::QueryGeneration(_)));
    }
}
