//! Controller configuration

use serde::{Deserialize, Serialize};

/// Search used when the controller is disabled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleRetrievalProfile {
    pub top_k: u32,
    pub similarity_threshold: f32,
}

impl Default for SimpleRetrievalProfile {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.3,
        }
    }
}

/// Configuration for the agentic controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgenticConfig {
    /// When disabled the controller runs one plain search and one plain generation
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Retrieval passes allowed per query; values below 1 are treated as 1
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_true")]
    pub use_hyde: bool,
    #[serde(default = "default_true")]
    pub use_self_rag: bool,
    #[serde(default)]
    pub simple_retrieval: SimpleRetrievalProfile,
}

fn default_true() -> bool {
    true
}

fn default_max_iterations() -> u32 {
    3
}

impl Default for AgenticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_iterations: default_max_iterations(),
            use_hyde: true,
            use_self_rag: true,
            simple_retrieval: SimpleRetrievalProfile::default(),
        }
    }
}

impl AgenticConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_hyde(mut self, use_hyde: bool) -> Self {
        self.use_hyde = use_hyde;
        self
    }

    pub fn with_self_rag(mut self, use_self_rag: bool) -> Self {
        self.use_self_rag = use_self_rag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgenticConfig::default();

        assert!(config.enabled);
        assert_eq!(config.max_iterations, 3);
        assert!(config.use_hyde);
        assert!(config.use_self_rag);
        assert_eq!(config.simple_retrieval.top_k, 5);
    }

    #[test]
    fn test_zero_iterations_is_kept() {
        let config = AgenticConfig::default().with_max_iterations(0);
        assert_eq!(config.max_iterations, 0);
    }
}
