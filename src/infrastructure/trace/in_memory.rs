use std::sync::Mutex;

use crate::domain::trace::{ReasoningStep, StepType, TraceSink};

/// Sink that keeps every step in memory, for audit views and tests
#[derive(Debug, Default)]
pub struct InMemoryTraceSink {
    steps: Mutex<Vec<ReasoningStep>>,
}

impl InMemoryTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded steps, in append order
    pub fn steps(&self) -> Vec<ReasoningStep> {
        self.steps
            .lock()
            .map(|steps| steps.clone())
            .unwrap_or_default()
    }

    pub fn steps_of(&self, step_type: StepType) -> Vec<ReasoningStep> {
        self.steps()
            .into_iter()
            .filter(|s| s.step_type == step_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.steps.lock().map(|steps| steps.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TraceSink for InMemoryTraceSink {
    fn append_step(&self, step: ReasoningStep) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(step);
        }
    }
}
