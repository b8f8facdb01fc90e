use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::OpenAiProvider;
use crate::domain::{DomainError, LlmProvider, TextCompletion};

/// Language model used by every pipeline stage
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key; unset or empty means no auth header
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the OpenAI-compatible provider described by the configuration
    pub fn create(config: &CompletionConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        if config.base_url.trim().is_empty() {
            return Err(DomainError::configuration("Completion base_url must not be empty"));
        }

        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        let http_client = HttpClient::with_timeout(Duration::from_millis(config.request_timeout_ms))?;

        Ok(Arc::new(OpenAiProvider::with_base_url(
            http_client,
            api_key,
            config.base_url.as_str(),
        )))
    }

    /// Create a completion handle bound to the configured model
    pub fn create_completion(config: &CompletionConfig) -> Result<TextCompletion, DomainError> {
        let provider = Self::create(config)?;

        Ok(TextCompletion::new(provider, config.model.as_str())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_completion() {
        let config = CompletionConfig {
            model: "local-model".to_string(),
            base_url: "http://localhost:11434".to_string(),
            api_key_env: "PMP_AGENTIC_RAG_TEST_UNSET_KEY".to_string(),
            ..CompletionConfig::default()
        };

        let completion = LlmProviderFactory::create_completion(&config).unwrap();
        assert_eq!(completion.model(), "local-model");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let config = CompletionConfig {
            base_url: "  ".to_string(),
            ..CompletionConfig::default()
        };

        let result = LlmProviderFactory::create(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_partial_deserialization() {
        let config: CompletionConfig = serde_json::from_str(r#"{"model": "m"}"#).unwrap();

        assert_eq!(config.model, "m");
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.max_tokens, 1024);
    }
}
