//! Controller output types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::knowledge_base::SearchResult;

pub const DIRECT_RESPONSE_MESSAGE: &str = "I'm here to help you search our knowledge base. \
Please ask a specific question about your documents.";

pub const INSUFFICIENT_EVIDENCE_MESSAGE: &str = "I couldn't find sufficient information in the \
knowledge base to answer your question. Please try rephrasing your query or contact an \
administrator if you believe the information should be available.";

pub const NO_INFORMATION_MESSAGE: &str = "No relevant information found.";

pub const UNABLE_TO_GENERATE_MESSAGE: &str = "Unable to generate response.";

pub const INSUFFICIENT_EVIDENCE_CONFIDENCE: f64 = 0.2;

pub const PLAIN_GENERATION_CONFIDENCE: f64 = 0.7;

const EXCERPT_CHARS: usize = 500;

/// Named state transitions recorded in `AgenticResult::executed_steps`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStep {
    Analyze,
    DirectResponse,
    HydeRetrieval,
    StandardRetrieval,
    CragValidation,
    QueryRewrite,
    InsufficientEvidence,
    SelfragGeneration,
    StandardGeneration,
    SimpleRetrieval,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyze => "ANALYZE",
            Self::DirectResponse => "DIRECT_RESPONSE",
            Self::HydeRetrieval => "HYDE_RETRIEVAL",
            Self::StandardRetrieval => "STANDARD_RETRIEVAL",
            Self::CragValidation => "CRAG_VALIDATION",
            Self::QueryRewrite => "QUERY_REWRITE",
            Self::InsufficientEvidence => "INSUFFICIENT_EVIDENCE",
            Self::SelfragGeneration => "SELFRAG_GENERATION",
            Self::StandardGeneration => "STANDARD_GENERATION",
            Self::SimpleRetrieval => "SIMPLE_RETRIEVAL",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final answer of one pipeline execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgenticResult {
    pub final_response: String,
    pub source_documents: Vec<SearchResult>,
    pub confidence: f64,
    pub executed_steps: Vec<PipelineStep>,
    pub iterations_used: u32,
    pub metrics: Map<String, Value>,
}

impl AgenticResult {
    pub fn has_step(&self, step: PipelineStep) -> bool {
        self.executed_steps.contains(&step)
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.executed_steps.iter().map(PipelineStep::as_str).collect()
    }
}

/// Answer assembled from document text when no model answer is available
pub fn excerpt_response(documents: &[SearchResult]) -> String {
    if documents.is_empty() {
        return NO_INFORMATION_MESSAGE.to_string();
    }

    let context: String = documents
        .iter()
        .map(|doc| format!("{}\n\n", doc.content))
        .collect();
    let excerpt: String = context.chars().take(EXCERPT_CHARS).collect();

    format!("Based on the retrieved information: {excerpt}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_serialization() {
        let json = serde_json::to_string(&PipelineStep::SelfragGeneration).unwrap();
        assert_eq!(json, "\"SELFRAG_GENERATION\"");
        assert_eq!(PipelineStep::CragValidation.to_string(), "CRAG_VALIDATION");
    }

    #[test]
    fn test_excerpt_response() {
        assert_eq!(excerpt_response(&[]), NO_INFORMATION_MESSAGE);

        let docs = vec![SearchResult::new("a", "alpha", 0.9)];
        assert_eq!(
            excerpt_response(&docs),
            "Based on the retrieved information: alpha\n\n..."
        );

        let long = vec![SearchResult::new("b", "x".repeat(900), 0.9)];
        let response = excerpt_response(&long);
        assert_eq!(response.matches('x').count(), 500);
    }
}
