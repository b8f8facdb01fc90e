//! Routing decision types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Retrieval granularity chosen for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingDecision {
    /// Answer without searching (greetings, meta questions)
    NoRetrieval,
    /// Paragraph-level lookup: few results, high precision
    Chunk,
    /// Document-level analysis: more results, high recall
    Document,
}

impl RoutingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingDecision::NoRetrieval => "NO_RETRIEVAL",
            RoutingDecision::Chunk => "CHUNK",
            RoutingDecision::Document => "DOCUMENT",
        }
    }
}

impl std::fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of the optional model-backed classifier tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SemanticRouterSignal {
    Disabled,
    Classified { duration_ms: u64 },
    Failed { error: String },
}

/// Lexical features of a query, computed once and never modified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSignals {
    pub word_count: usize,
    pub has_question_mark: bool,
    /// Vague-reference phrasing that benefits from hypothesis-driven retrieval
    pub is_hyde: bool,
    pub is_multi_hop: bool,
    pub has_named_entity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_router: Option<SemanticRouterSignal>,
}

impl RoutingSignals {
    pub(crate) fn with_semantic(mut self, signal: SemanticRouterSignal) -> Self {
        self.semantic_router = Some(signal);
        self
    }

    /// Signals as an ordered name/value map for trace records
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("wordCount".to_string(), Value::from(self.word_count));
        map.insert("hasQuestionMark".to_string(), Value::from(self.has_question_mark));
        map.insert("isHyde".to_string(), Value::from(self.is_hyde));
        map.insert("isMultiHop".to_string(), Value::from(self.is_multi_hop));
        map.insert("hasNamedEntity".to_string(), Value::from(self.has_named_entity));

        match &self.semantic_router {
            Some(SemanticRouterSignal::Disabled) => {
                map.insert("semanticRouter".to_string(), Value::from("disabled"));
            }
            Some(SemanticRouterSignal::Classified { duration_ms }) => {
                map.insert("llmDuration".to_string(), Value::from(*duration_ms));
            }
            Some(SemanticRouterSignal::Failed { error }) => {
                map.insert("routerError".to_string(), Value::from(error.as_str()));
            }
            None => {}
        }

        map
    }
}

/// Result of routing one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub decision: RoutingDecision,
    pub reason: String,
    /// Confidence in the decision (0.0 - 1.0)
    pub confidence: f64,
    /// `None` when routing short-circuited before features were computed
    pub signals: Option<RoutingSignals>,
}

impl RoutingResult {
    pub fn new(decision: RoutingDecision, reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            decision,
            reason: reason.into(),
            confidence: confidence.clamp(0.0, 1.0),
            signals: None,
        }
    }

    pub fn with_signals(mut self, signals: RoutingSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Whether the router flagged the query for hypothesis-driven retrieval
    pub fn is_hyde(&self) -> bool {
        self.signals.as_ref().is_some_and(|s| s.is_hyde)
    }

    pub fn skips_retrieval(&self) -> bool {
        self.decision == RoutingDecision::NoRetrieval
    }

    /// Signal map, empty when no signals were computed
    pub fn signal_map(&self) -> Map<String, Value> {
        self.signals.as_ref().map(RoutingSignals::to_map).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(is_hyde: bool) -> RoutingSignals {
        RoutingSignals {
            word_count: 4,
            has_question_mark: true,
            is_hyde,
            is_multi_hop: false,
            has_named_entity: false,
            semantic_router: None,
        }
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_string(&RoutingDecision::NoRetrieval).unwrap();
        assert_eq!(json, "\"NO_RETRIEVAL\"");
        assert_eq!(RoutingDecision::Document.to_string(), "DOCUMENT");
    }

    #[test]
    fn test_signal_map_keys() {
        let map = signals(true)
            .with_semantic(SemanticRouterSignal::Disabled)
            .to_map();

        assert_eq!(map["wordCount"], 4);
        assert_eq!(map["isHyde"], true);
        assert_eq!(map["semanticRouter"], "disabled");
    }

    #[test]
    fn test_is_hyde_without_signals() {
        let result = RoutingResult::new(RoutingDecision::Chunk, "disabled", 1.0);
        assert!(!result.is_hyde());
        assert!(result.signal_map().is_empty());

        let result = result.with_signals(signals(true));
        assert!(result.is_hyde());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let result = RoutingResult::new(RoutingDecision::Document, "x", 1.7);
        assert_eq!(result.confidence, 1.0);
    }
}
