//! Per-request trace context

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::step::{ReasoningStep, StepType};

/// Append-only step log.
///
/// Fire-and-forget: implementations must not block for long and must swallow
/// their own failures, because the pipeline never waits on or reacts to them.
#[cfg_attr(test, automock)]
pub trait TraceSink: Send + Sync + std::fmt::Debug {
    fn append_step(&self, step: ReasoningStep);
}

/// Sink that drops every step
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn append_step(&self, _step: ReasoningStep) {}
}

/// Trace of one query execution, handed by reference to every stage
#[derive(Debug, Clone)]
pub struct TraceContext {
    trace_id: Uuid,
    query: String,
    scope: Option<String>,
    started_at: DateTime<Utc>,
    sink: Arc<dyn TraceSink>,
}

impl TraceContext {
    pub fn new(query: impl Into<String>, scope: Option<&str>, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            query: query.into(),
            scope: scope.map(str::to_string),
            started_at: Utc::now(),
            sink,
        }
    }

    /// Context whose steps go nowhere, for stages invoked outside a pipeline
    pub fn detached() -> Self {
        Self::new("", None, Arc::new(NoopTraceSink))
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Milliseconds since the context was created
    pub fn elapsed_ms(&self) -> u64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as u64
    }

    /// Append one step to the sink
    pub fn add_step(
        &self,
        step_type: StepType,
        label: &str,
        detail: impl Into<String>,
        duration_ms: u64,
        data: Map<String, Value>,
    ) {
        let step = ReasoningStep::new(step_type, label, detail, duration_ms).with_data(data);
        self.sink.append_step(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_step_forwards_to_sink() {
        let mut sink = MockTraceSink::new();
        sink.expect_append_step()
            .withf(|step| step.step_type == StepType::Validation && step.label == "Grading")
            .times(1)
            .return_const(());

        let ctx = TraceContext::new("query", Some("hr"), Arc::new(sink));
        ctx.add_step(StepType::Validation, "Grading", "ok", 3, Map::new());

        assert_eq!(ctx.query(), "query");
        assert_eq!(ctx.scope(), Some("hr"));
    }

    #[test]
    fn test_contexts_have_distinct_ids() {
        let a = TraceContext::detached();
        let b = TraceContext::detached();

        assert_ne!(a.trace_id(), b.trace_id());
        a.add_step(StepType::Error, "noop", "", 0, Map::new());
    }
}
