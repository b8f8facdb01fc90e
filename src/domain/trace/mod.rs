//! Execution trace domain
//!
//! Every pipeline stage appends one step per decision to a write-only sink.
//! The sink is reached through an explicit [`TraceContext`] created per
//! request and passed by reference through the stages.

mod context;
mod step;

pub use context::{NoopTraceSink, TraceContext, TraceSink};
pub use step::{ReasoningStep, StepType};

#[cfg(test)]
pub use context::MockTraceSink;
