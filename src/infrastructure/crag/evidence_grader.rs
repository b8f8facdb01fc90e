//! Evidence grader
//!
//! Grades every retrieved document independently. A failed or unparseable
//! model call degrades only that document to the keyword heuristic.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::crag::{
    grade_by_keywords, grading_prompt, parse_grade_label, CragConfig, CragResult, GradedDocument,
    GRADER_SYSTEM_PROMPT,
};
use crate::domain::knowledge_base::SearchResult;
use crate::domain::trace::{StepType, TraceContext};
use crate::domain::TextCompletion;
use crate::infrastructure::logging::query_summary;
use crate::infrastructure::observability::record_crag_decision;

/// Converts a retrieved document set into a go/no-go decision
#[derive(Debug, Clone)]
pub struct EvidenceGrader {
    config: CragConfig,
    completion: Option<TextCompletion>,
}

impl EvidenceGrader {
    pub fn new(config: CragConfig) -> Self {
        Self {
            config,
            completion: None,
        }
    }

    /// Model used for per-document grading
    pub fn with_completion(mut self, completion: TextCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn config(&self) -> &CragConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Grade `documents` against `query` and apply the decision policy
    pub async fn evaluate(
        &self,
        query: &str,
        documents: Vec<SearchResult>,
        trace: &TraceContext,
    ) -> CragResult {
        let started = Instant::now();

        if !self.config.enabled {
            debug!("Evidence grading disabled, passing {} documents through", documents.len());
            let result = CragResult::passthrough(documents);
            return self.finish(result, started, trace);
        }

        if documents.is_empty() {
            info!("No documents retrieved for {}, rewrite needed", query_summary(query));
            return self.finish(CragResult::no_documents(), started, trace);
        }

        let mut graded = Vec::with_capacity(documents.len());
        for document in documents {
            graded.push(self.grade_document(query, document).await);
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let result = CragResult::from_grades(graded, self.config.min_correct_threshold, elapsed_ms);
        self.finish(result, started, trace)
    }

    /// Grade one document, falling back to keyword overlap
    pub async fn grade_document(&self, query: &str, document: SearchResult) -> GradedDocument {
        let completion = match (&self.completion, self.config.use_llm_grading) {
            (Some(completion), true) => completion,
            _ => return grade_by_keywords(query, document),
        };

        let prompt = grading_prompt(query, &document.content, self.config.max_content_chars);
        match completion.complete(Some(GRADER_SYSTEM_PROMPT), &prompt).await {
            Ok(reply) => match parse_grade_label(&reply) {
                Some(grade) => GradedDocument::from_model(document, grade),
                None => {
                    warn!(
                        "Unparseable grade for document {}, using keyword heuristic",
                        document.id
                    );
                    grade_by_keywords(query, document)
                }
            },
            Err(e) => {
                warn!(
                    "LLM grading failed for document {}, using keyword heuristic: {}",
                    document.id, e
                );
                grade_by_keywords(query, document)
            }
        }
    }

    fn finish(&self, result: CragResult, started: Instant, trace: &TraceContext) -> CragResult {
        let elapsed = started.elapsed();
        let metrics = &result.metrics;

        info!(
            "Evidence grading: {} (total={}, correct={}, ambiguous={}, incorrect={})",
            result.decision,
            metrics.total_documents,
            metrics.correct_count,
            metrics.ambiguous_count,
            metrics.incorrect_count
        );
        record_crag_decision(result.decision, metrics.total_documents, elapsed);

        let mut data = metrics.to_map();
        data.insert("decision".to_string(), Value::from(result.decision.as_str()));
        data.insert("confidence".to_string(), Value::from(result.overall_confidence));
        trace.add_step(
            StepType::Validation,
            "CRAG Document Grading",
            format!(
                "{}: {} ({:.0}% confidence)",
                result.decision,
                result.reason,
                result.overall_confidence * 100.0
            ),
            elapsed.as_millis() as u64,
            data,
        );

        result
    }
}
