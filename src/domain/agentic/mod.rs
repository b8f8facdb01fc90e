//! Agentic controller domain: configuration, step names and final result

mod config;
mod result;

pub use config::{AgenticConfig, SimpleRetrievalProfile};
pub use result::{
    excerpt_response, AgenticResult, PipelineStep, DIRECT_RESPONSE_MESSAGE,
    INSUFFICIENT_EVIDENCE_CONFIDENCE, INSUFFICIENT_EVIDENCE_MESSAGE, NO_INFORMATION_MESSAGE,
    PLAIN_GENERATION_CONFIDENCE, UNABLE_TO_GENERATE_MESSAGE,
};
