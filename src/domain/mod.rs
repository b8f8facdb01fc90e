//! Domain layer - pipeline types, parsing grammars and decision policies

pub mod agentic;
pub mod crag;
pub mod error;
pub mod hyde;
pub mod knowledge_base;
pub mod llm;
pub mod reflection;
pub mod rewrite;
pub mod routing;
pub mod trace;

pub use agentic::{AgenticConfig, AgenticResult, PipelineStep};
pub use crag::{CragConfig, CragDecision, CragResult, DocumentGrade, GradedDocument};
pub use error::DomainError;
pub use hyde::{HydeConfig, HydeResult};
pub use knowledge_base::{EvidenceSearch, SearchParams, SearchResult};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    TextCompletion, Usage,
};
pub use reflection::{ReflectedClaim, ReflectionConfig, ReflectionResult, ReflectionToken};
pub use rewrite::RewriteConfig;
pub use routing::{
    RetrievalProfile, RouterConfig, RoutingDecision, RoutingResult, RoutingSignals,
    RoutingWeights,
};
pub use trace::{NoopTraceSink, ReasoningStep, StepType, TraceContext, TraceSink};
