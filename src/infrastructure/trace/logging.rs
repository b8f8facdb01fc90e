use tracing::debug;

use crate::domain::trace::{ReasoningStep, TraceSink};

/// Sink that emits each step as a `tracing` debug event
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTraceSink;

impl TraceSink for LoggingTraceSink {
    fn append_step(&self, step: ReasoningStep) {
        debug!(
            step_type = %step.step_type,
            label = %step.label,
            duration_ms = step.duration_ms,
            data = %serde_json::Value::Object(step.data),
            "{}",
            step.detail
        );
    }
}
