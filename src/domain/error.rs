use thiserror::Error;

/// Core domain errors
///
/// These never escape the pipeline: every stage catches them locally and
/// applies its fallback. They surface only from collaborator adapters and
/// configuration loading.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Search error: {message}")]
    Search { message: String },

    #[error("Timeout: {operation} exceeded {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from an external collaborator (search or completion)
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Search { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("openai", "rate limited");
        assert_eq!(error.to_string(), "Provider error: openai - rate limited");
        assert!(error.is_collaborator_failure());
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("query rewrite", 2000);
        assert_eq!(error.to_string(), "Timeout: query rewrite exceeded 2000ms");
        assert!(error.is_collaborator_failure());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
        assert!(!error.is_collaborator_failure());
    }
}
