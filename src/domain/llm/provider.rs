use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for LLM providers (OpenAI-compatible endpoints, local models, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum Reply {
        Text(String),
        Error(String),
    }

    /// Scripted LLM provider.
    ///
    /// Rules are matched in insertion order against the concatenated system
    /// and user text of each request; the first rule whose needle is contained
    /// wins. Unmatched requests fall back to the default reply.
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        rules: Vec<(String, Reply)>,
        default: Option<Reply>,
        calls: AtomicUsize,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                rules: Vec::new(),
                default: None,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(mut self, response: LlmResponse) -> Self {
            self.default = Some(Reply::Text(response.message.content));
            self
        }

        pub fn with_text(mut self, text: impl Into<String>) -> Self {
            self.default = Some(Reply::Text(text.into()));
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.default = Some(Reply::Error(error.into()));
            self
        }

        pub fn with_reply_when(mut self, needle: impl Into<String>, text: impl Into<String>) -> Self {
            self.rules.push((needle.into(), Reply::Text(text.into())));
            self
        }

        pub fn with_error_when(mut self, needle: impl Into<String>, error: impl Into<String>) -> Self {
            self.rules.push((needle.into(), Reply::Error(error.into())));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let haystack = format!(
                "{}\n{}",
                request.system_text().unwrap_or(""),
                request.user_text().unwrap_or("")
            );
            self.requests.lock().unwrap().push(request);

            let reply = self
                .rules
                .iter()
                .find(|(needle, _)| haystack.contains(needle.as_str()))
                .map(|(_, reply)| reply.clone())
                .or_else(|| self.default.clone());

            match reply {
                Some(Reply::Text(text)) => Ok(LlmResponse::text(model, text)),
                Some(Reply::Error(error)) => Err(DomainError::provider(self.name, error)),
                None => Err(DomainError::provider(self.name, "No mock response configured")),
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_rules_take_precedence_over_default() {
            let provider = MockLlmProvider::new("mock")
                .with_reply_when("grader", "CORRECT")
                .with_text("fallback");

            let graded = provider
                .chat("m", LlmRequest::builder().system("You are a grader").user("q").build())
                .await
                .unwrap();
            let other = provider
                .chat("m", LlmRequest::builder().user("hello").build())
                .await
                .unwrap();

            assert_eq!(graded.content(), Some("CORRECT"));
            assert_eq!(other.content(), Some("fallback"));
            assert_eq!(provider.call_count(), 2);
        }

        #[tokio::test]
        async fn test_unconfigured_mock_errors() {
            let provider = MockLlmProvider::new("mock");
            let result = provider.chat("m", LlmRequest::builder().user("x").build()).await;
            assert!(result.is_err());
        }
    }
}
