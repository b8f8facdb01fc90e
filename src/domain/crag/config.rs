//! CRAG configuration types

use serde::{Deserialize, Serialize};

/// Relevance grade assigned to one retrieved document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentGrade {
    /// Document directly contains information to answer the query
    Correct,
    /// Document is related but does not fully answer the query
    Ambiguous,
    /// Document is not relevant to the query
    Incorrect,
}

impl DocumentGrade {
    /// Relevance score given to a grade produced by the language model
    pub fn model_score(&self) -> f64 {
        match self {
            Self::Correct => 0.9,
            Self::Ambiguous => 0.5,
            Self::Incorrect => 0.1,
        }
    }

    /// Check if this grade can be used as evidence
    pub fn is_usable(&self) -> bool {
        !matches!(self, Self::Incorrect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Ambiguous => "AMBIGUOUS",
            Self::Incorrect => "INCORRECT",
        }
    }
}

impl std::fmt::Display for DocumentGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const GRADER_SYSTEM_PROMPT: &str = "You are a relevance grader for a RAG system.
Given a USER QUERY and a DOCUMENT, determine if the document helps answer the query.

Respond with ONLY one of these grades:
- CORRECT: Document directly contains information to answer the query
- AMBIGUOUS: Document is related but doesn't fully answer the query
- INCORRECT: Document is not relevant to the query

Be strict: if the document doesn't contain specific facts needed, mark it INCORRECT.
";

/// Configuration for evidence grading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CragConfig {
    /// When disabled every document passes through as CORRECT
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fraction of documents that must be CORRECT (or usable) to proceed
    #[serde(default = "default_min_correct_threshold")]
    pub min_correct_threshold: f64,
    /// Grade with the language model; keyword overlap otherwise
    #[serde(default = "default_true")]
    pub use_llm_grading: bool,
    /// Document content is truncated to this many characters before grading
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_min_correct_threshold() -> f64 {
    0.5
}

fn default_max_content_chars() -> usize {
    500
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_correct_threshold: default_min_correct_threshold(),
            use_llm_grading: true,
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl CragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_min_correct_threshold(mut self, threshold: f64) -> Self {
        self.min_correct_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_llm_grading(mut self, use_llm_grading: bool) -> Self {
        self.use_llm_grading = use_llm_grading;
        self
    }

    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CragConfig::default();

        assert!(config.enabled);
        assert!(config.use_llm_grading);
        assert_eq!(config.min_correct_threshold, 0.5);
        assert_eq!(config.max_content_chars, 500);
    }

    #[test]
    fn test_threshold_clamping() {
        let config = CragConfig::new().with_min_correct_threshold(1.5);
        assert_eq!(config.min_correct_threshold, 1.0);
    }

    #[test]
    fn test_partial_deserialization() {
        let config: CragConfig =
            serde_json::from_str(r#"{"use_llm_grading": false}"#).unwrap();

        assert!(config.enabled);
        assert!(!config.use_llm_grading);
        assert_eq!(config.min_correct_threshold, 0.5);
    }

    #[test]
    fn test_grade_scores() {
        assert_eq!(DocumentGrade::Correct.model_score(), 0.9);
        assert_eq!(DocumentGrade::Ambiguous.model_score(), 0.5);
        assert_eq!(DocumentGrade::Incorrect.model_score(), 0.1);
        assert!(DocumentGrade::Ambiguous.is_usable());
        assert!(!DocumentGrade::Incorrect.is_usable());
    }
}
