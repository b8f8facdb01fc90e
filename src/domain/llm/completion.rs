//! Text completion contract used by every pipeline stage

use std::sync::Arc;

use super::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

/// A provider bound to one model and sampling profile.
///
/// Stages see only `complete(system, user) -> text`. The reply is untrusted
/// free-form text; callers parse it defensively.
#[derive(Debug, Clone)]
pub struct TextCompletion {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl TextCompletion {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion call and return the reply text
    pub async fn complete(&self, system: Option<&str>, user: &str) -> Result<String, DomainError> {
        let mut builder = LlmRequest::builder();

        if let Some(system) = system {
            builder = builder.system(system);
        }
        builder = builder.user(user);

        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        let response = self.provider.chat(&self.model, builder.build()).await?;

        response.content().map(str::to_string).ok_or_else(|| {
            DomainError::provider(self.provider.provider_name(), "Empty response from LLM")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_complete_sends_system_and_user() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("answer"));
        let completion = TextCompletion::new(provider.clone(), "gpt-4o-mini")
            .with_temperature(0.0)
            .with_max_tokens(64);

        let text = completion.complete(Some("system rules"), "the question").await.unwrap();

        assert_eq!(text, "answer");
        let requests = provider.requests();
        assert_eq!(requests[0].system_text(), Some("system rules"));
        assert_eq!(requests[0].user_text(), Some("the question"));
        assert_eq!(requests[0].max_tokens, Some(64));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("  "));
        let completion = TextCompletion::new(provider, "m");

        let result = completion.complete(None, "q").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("unavailable"));
        let completion = TextCompletion::new(provider, "m");

        assert!(completion.complete(None, "q").await.is_err());
    }
}
