//! Agentic controller
//!
//! ANALYZE -> DIRECT_RESPONSE | RETRIEVE -> VALIDATE -> GENERATE | REWRITE -> RETRIEVE | INSUFFICIENT.
//! The retrieval loop runs at most `max_iterations` times; a budget of zero
//! ends in the insufficient-evidence answer without searching. No stage
//! failure escapes `process`; the worst outcome is the insufficient-evidence
//! answer.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::config::AgenticRagConfig;
use crate::domain::agentic::{
    excerpt_response, AgenticConfig, AgenticResult, PipelineStep, DIRECT_RESPONSE_MESSAGE,
    INSUFFICIENT_EVIDENCE_CONFIDENCE, INSUFFICIENT_EVIDENCE_MESSAGE, NO_INFORMATION_MESSAGE,
    PLAIN_GENERATION_CONFIDENCE,
};
use crate::domain::knowledge_base::{EvidenceSearch, SearchParams, SearchResult};
use crate::domain::reflection::build_context;
use crate::domain::routing::RoutingResult;
use crate::domain::trace::{NoopTraceSink, StepType, TraceContext, TraceSink};
use crate::domain::{DomainError, TextCompletion};
use crate::infrastructure::crag::{EvidenceGrader, QueryRewriter};
use crate::infrastructure::hyde::HypothesisAugmenter;
use crate::infrastructure::llm::LlmProviderFactory;
use crate::infrastructure::logging::query_summary;
use crate::infrastructure::observability::record_pipeline_outcome;
use crate::infrastructure::reflection::ReflectiveGenerator;
use crate::infrastructure::routing::QueryRouter;

/// Steps, metrics and iteration count accumulated during one execution
#[derive(Debug, Default)]
struct Execution {
    steps: Vec<PipelineStep>,
    metrics: Map<String, Value>,
    iterations: u32,
}

impl Execution {
    fn push(&mut self, step: PipelineStep) {
        debug!("Pipeline step: {}", step);
        self.steps.push(step);
    }

    fn record(&mut self, key: &str, value: impl Into<Value>) {
        self.metrics.insert(key.to_string(), value.into());
    }

    fn finish(
        self,
        final_response: impl Into<String>,
        source_documents: Vec<SearchResult>,
        confidence: f64,
    ) -> AgenticResult {
        AgenticResult {
            final_response: final_response.into(),
            source_documents,
            confidence,
            executed_steps: self.steps,
            iterations_used: self.iterations,
            metrics: self.metrics,
        }
    }
}

/// Runs the full decision-and-recovery pipeline for one query at a time
#[derive(Debug, Clone)]
pub struct AgenticController {
    config: AgenticConfig,
    router: QueryRouter,
    grader: EvidenceGrader,
    rewriter: QueryRewriter,
    augmenter: HypothesisAugmenter,
    generator: ReflectiveGenerator,
    search: Arc<dyn EvidenceSearch>,
    completion: TextCompletion,
    sink: Arc<dyn TraceSink>,
}

impl AgenticController {
    /// Build every stage from configuration, sharing one completion model
    pub fn new(
        config: &AgenticRagConfig,
        search: Arc<dyn EvidenceSearch>,
        completion: TextCompletion,
    ) -> Self {
        Self {
            config: config.orchestrator.clone(),
            router: QueryRouter::new(config.router.clone()).with_completion(completion.clone()),
            grader: EvidenceGrader::new(config.crag.clone()).with_completion(completion.clone()),
            rewriter: QueryRewriter::new(config.rewrite.clone(), completion.clone()),
            augmenter: HypothesisAugmenter::new(
                config.hyde.clone(),
                search.clone(),
                completion.clone(),
            ),
            generator: ReflectiveGenerator::new(config.reflection.clone(), completion.clone()),
            search,
            completion,
            sink: Arc::new(NoopTraceSink),
        }
    }

    /// Build the controller with the completion model described by `config.completion`
    pub fn from_config(
        config: &AgenticRagConfig,
        search: Arc<dyn EvidenceSearch>,
    ) -> Result<Self, DomainError> {
        let completion = LlmProviderFactory::create_completion(&config.completion)?;
        Ok(Self::new(config, search, completion))
    }

    /// Sink receiving the steps of every execution started by `process`
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &AgenticConfig {
        &self.config
    }

    pub fn router(&self) -> &QueryRouter {
        &self.router
    }

    /// Answer `query`, restricting every search to `scope`
    pub async fn process(&self, query: &str, scope: Option<&str>) -> AgenticResult {
        let trace = TraceContext::new(query, scope, self.sink.clone());
        self.process_with_trace(query, &trace).await
    }

    /// Answer `query` within a caller-supplied trace; the scope comes from the trace
    pub async fn process_with_trace(&self, query: &str, trace: &TraceContext) -> AgenticResult {
        let started = Instant::now();
        info!(
            "Processing query {} (trace {})",
            query_summary(query),
            trace.trace_id()
        );

        let (mut result, outcome) = if self.config.enabled {
            self.run_pipeline(query, trace).await
        } else {
            (self.simple_retrieval(query, trace).await, "simple")
        };

        let elapsed = started.elapsed();
        result
            .metrics
            .insert("totalMs".to_string(), Value::from(elapsed.as_millis() as u64));

        info!(
            "Pipeline finished: {} in {} iterations, confidence {:.2} ({}ms) [{}]",
            outcome,
            result.iterations_used,
            result.confidence,
            elapsed.as_millis(),
            result.step_names().join(" -> ")
        );
        record_pipeline_outcome(outcome, result.iterations_used, result.confidence, elapsed);

        let mut data = result.metrics.clone();
        data.insert("steps".to_string(), Value::from(result.step_names()));
        data.insert("outcome".to_string(), Value::from(outcome));
        data.insert("traceElapsedMs".to_string(), Value::from(trace.elapsed_ms()));
        trace.add_step(
            StepType::Orchestration,
            "Agentic RAG Orchestration",
            format!(
                "{} ({} iterations, {:.0}% confidence)",
                result.step_names().join(" -> "),
                result.iterations_used,
                result.confidence * 100.0
            ),
            elapsed.as_millis() as u64,
            data,
        );

        result
    }

    async fn run_pipeline(&self, query: &str, trace: &TraceContext) -> (AgenticResult, &'static str) {
        let scope = trace.scope();
        let mut run = Execution::default();

        run.push(PipelineStep::Analyze);
        let routing = self.router.route(query, trace).await;
        run.record("routingDecision", routing.decision.as_str());
        run.record("routingConfidence", routing.confidence);

        if self.router.should_skip_retrieval(routing.decision) {
            return (
                self.answer_without_evidence(
                    run,
                    PipelineStep::DirectResponse,
                    DIRECT_RESPONSE_MESSAGE,
                    1.0,
                    trace,
                ),
                "direct_response",
            );
        }

        let budget = self.config.max_iterations;
        if budget == 0 {
            warn!("Iteration budget is zero, skipping retrieval for {}", query_summary(query));
            return (self.insufficient_evidence(run, trace), "insufficient_evidence");
        }

        let mut current_query = query.to_string();
        let mut documents = Vec::new();

        for iteration in 1..=budget {
            run.iterations = iteration;
            run.record("iteration", iteration);

            let retrieved = self
                .retrieve(&current_query, &routing, scope, trace, &mut run)
                .await;

            run.push(PipelineStep::CragValidation);
            let crag = self.grader.evaluate(&current_query, retrieved, trace).await;
            run.record("cragDecision", crag.decision.as_str());
            run.record("cragConfidence", crag.overall_confidence);

            if crag.has_sufficient_evidence() {
                documents = crag.usable_documents();
                break;
            }

            if iteration == budget || !crag.needs_rewrite() {
                documents = crag.usable_documents();
                if documents.is_empty() {
                    warn!(
                        "No usable evidence after {} iterations for {}",
                        iteration,
                        query_summary(query)
                    );
                    return (self.insufficient_evidence(run, trace), "insufficient_evidence");
                }
                break;
            }

            run.push(PipelineStep::QueryRewrite);
            current_query = self.rewriter.rewrite_query(&current_query, trace).await;
            run.record("rewrittenQuery", current_query.as_str());
        }

        let (response, confidence) = if self.config.use_self_rag {
            run.push(PipelineStep::SelfragGeneration);
            let reflection = self
                .generator
                .generate_with_reflection(query, &documents, trace)
                .await;
            run.record("selfRagClaims", reflection.claims.len());
            run.record("uncertainClaims", reflection.uncertain_claims.len());
            (reflection.clean_response, reflection.confidence)
        } else {
            run.push(PipelineStep::StandardGeneration);
            self.plain_generation(query, &documents, trace).await
        };

        (run.finish(response, documents, confidence), "answered")
    }

    /// One retrieval pass: hypothesis-driven when flagged or suitable, plain otherwise
    async fn retrieve(
        &self,
        query: &str,
        routing: &RoutingResult,
        scope: Option<&str>,
        trace: &TraceContext,
        run: &mut Execution,
    ) -> Vec<SearchResult> {
        if self.config.use_hyde {
            let source = if self.augmenter.should_use(routing) {
                Some("routing_signal")
            } else if self.augmenter.is_suitable(query) {
                Some("query_analysis")
            } else {
                None
            };

            if let Some(source) = source {
                run.push(PipelineStep::HydeRetrieval);
                let hyde = self.augmenter.retrieve(query, scope, trace).await;
                run.record("hydeApplied", hyde.applied);
                run.record("hydeSource", source);
                return hyde.documents;
            }
        }

        run.push(PipelineStep::StandardRetrieval);
        run.record("hydeApplied", false);

        let params = SearchParams::new(query)
            .with_top_k(self.router.top_k(routing.decision))
            .with_similarity_threshold(self.router.similarity_threshold(routing.decision))
            .with_scope(scope);
        self.search_or_empty(params, "Standard Retrieval", trace).await
    }

    /// Safety fallback: one plain search and one plain generation
    async fn simple_retrieval(&self, query: &str, trace: &TraceContext) -> AgenticResult {
        let mut run = Execution::default();
        run.push(PipelineStep::SimpleRetrieval);
        run.iterations = 1;
        run.record("mode", "disabled");

        let profile = self.config.simple_retrieval;
        let params = SearchParams::new(query)
            .with_top_k(profile.top_k)
            .with_similarity_threshold(profile.similarity_threshold)
            .with_scope(trace.scope());
        let documents = self.search_or_empty(params, "Simple Retrieval", trace).await;

        let (response, confidence) = self.plain_generation(query, &documents, trace).await;
        run.finish(response, documents, confidence)
    }

    fn insufficient_evidence(&self, run: Execution, trace: &TraceContext) -> AgenticResult {
        self.answer_without_evidence(
            run,
            PipelineStep::InsufficientEvidence,
            INSUFFICIENT_EVIDENCE_MESSAGE,
            INSUFFICIENT_EVIDENCE_CONFIDENCE,
            trace,
        )
    }

    /// Terminal answer that carries no source documents
    fn answer_without_evidence(
        &self,
        mut run: Execution,
        step: PipelineStep,
        message: &str,
        confidence: f64,
        trace: &TraceContext,
    ) -> AgenticResult {
        run.push(step);

        let mut data = Map::new();
        data.insert("step".to_string(), Value::from(step.as_str()));
        data.insert("confidence".to_string(), Value::from(confidence));
        let label = match step {
            PipelineStep::DirectResponse => "Direct Response",
            _ => "Insufficient Evidence",
        };
        trace.add_step(StepType::Generation, label, message, 0, data);

        run.finish(message, Vec::new(), confidence)
    }

    async fn search_or_empty(
        &self,
        params: SearchParams,
        label: &str,
        trace: &TraceContext,
    ) -> Vec<SearchResult> {
        let started = Instant::now();
        let top_k = params.top_k;
        let threshold = params.similarity_threshold;

        match self.search.search(params).await {
            Ok(documents) => {
                debug!("{} returned {} documents", label, documents.len());
                let mut data = Map::new();
                data.insert("resultCount".to_string(), Value::from(documents.len()));
                data.insert("topK".to_string(), Value::from(top_k));
                data.insert("similarityThreshold".to_string(), Value::from(threshold));
                trace.add_step(
                    StepType::Retrieval,
                    label,
                    format!("{} documents (top_k={}, threshold={})", documents.len(), top_k, threshold),
                    started.elapsed().as_millis() as u64,
                    data,
                );
                documents
            }
            Err(e) => {
                error!("{} failed: {}", label, e);
                trace.add_step(
                    StepType::Error,
                    label,
                    e.to_string(),
                    started.elapsed().as_millis() as u64,
                    Map::new(),
                );
                Vec::new()
            }
        }
    }

    /// Untagged answer at the fixed plain-generation confidence
    async fn plain_generation(
        &self,
        query: &str,
        documents: &[SearchResult],
        trace: &TraceContext,
    ) -> (String, f64) {
        let started = Instant::now();

        let (response, mode) = if documents.is_empty() {
            (NO_INFORMATION_MESSAGE.to_string(), "no_documents")
        } else {
            let prompt = format!("Context: {}\n\nQuestion: {}", build_context(documents), query);
            match self.completion.complete(None, &prompt).await {
                Ok(text) => (text.trim().to_string(), "standard"),
                Err(e) => {
                    if e.is_collaborator_failure() {
                        warn!("Generation failed, answering with document excerpts: {}", e);
                    } else {
                        error!("Generation failed, answering with document excerpts: {}", e);
                    }
                    (excerpt_response(documents), "excerpt_fallback")
                }
            }
        };

        let mut data = Map::new();
        data.insert("mode".to_string(), Value::from(mode));
        data.insert("documentCount".to_string(), Value::from(documents.len()));
        trace.add_step(
            StepType::Generation,
            "Standard Generation",
            format!("{} answer from {} documents", mode, documents.len()),
            started.elapsed().as_millis() as u64,
            data,
        );

        (response, PLAIN_GENERATION_CONFIDENCE)
    }
}
