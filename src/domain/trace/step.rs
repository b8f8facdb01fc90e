//! Trace step record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of pipeline stage that produced a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    QueryRouting,
    Retrieval,
    Validation,
    QueryRewrite,
    Generation,
    Orchestration,
    Error,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::QueryRouting => "query_routing",
            StepType::Retrieval => "retrieval",
            StepType::Validation => "validation",
            StepType::QueryRewrite => "query_rewrite",
            StepType::Generation => "generation",
            StepType::Orchestration => "orchestration",
            StepType::Error => "error",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One appended trace record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step_type: StepType,
    pub label: String,
    pub detail: String,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl ReasoningStep {
    pub fn new(
        step_type: StepType,
        label: impl Into<String>,
        detail: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            step_type,
            label: label.into(),
            detail: detail.into(),
            duration_ms,
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }
}
