//! Infrastructure layer - pipeline services and external service implementations

pub mod agentic;
pub mod crag;
pub mod hyde;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod reflection;
pub mod routing;
pub mod trace;

pub use agentic::AgenticController;
pub use crag::{EvidenceGrader, QueryRewriter};
pub use hyde::HypothesisAugmenter;
pub use reflection::ReflectiveGenerator;
pub use routing::QueryRouter;
pub use trace::{InMemoryTraceSink, LoggingTraceSink};
