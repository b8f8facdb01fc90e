//! Reflective generator
//!
//! Produces the final answer with every claim tagged by a support marker.
//! Falls back to an untagged completion when the reflective call fails.

use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::domain::agentic::{PLAIN_GENERATION_CONFIDENCE, UNABLE_TO_GENERATE_MESSAGE};
use crate::domain::knowledge_base::SearchResult;
use crate::domain::reflection::{
    build_context, clean_response, doubtful_claims, overall_confidence, parse_claims,
    ReflectionConfig, ReflectionResult, ReflectionToken, REFLECTION_SYSTEM_PROMPT,
    VERIFICATION_SYSTEM_PROMPT,
};
use crate::domain::trace::{StepType, TraceContext};
use crate::domain::TextCompletion;

/// Confidence reported when verification could not run
const UNVERIFIED_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct ReflectiveGenerator {
    config: ReflectionConfig,
    completion: TextCompletion,
}

impl ReflectiveGenerator {
    pub fn new(config: ReflectionConfig, completion: TextCompletion) -> Self {
        Self { config, completion }
    }

    pub fn config(&self) -> &ReflectionConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Answer `query` from `documents`, tagging each claim
    pub async fn generate_with_reflection(
        &self,
        query: &str,
        documents: &[SearchResult],
        trace: &TraceContext,
    ) -> ReflectionResult {
        let context = build_context(documents);

        let started = Instant::now();

        if !self.config.enabled {
            return self.traced_standard_generation(query, &context, started, trace).await;
        }

        let prompt = format!(
            "CONTEXT:\n{}\n\nQUESTION: {}\n\nAnswer the question using the context. \
             Mark each claim with reflection tokens.\n",
            context, query
        );

        let raw = match self.completion.complete(Some(REFLECTION_SYSTEM_PROMPT), &prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.is_collaborator_failure() {
                    warn!("Reflective generation failed, using standard generation: {}", e);
                } else {
                    error!("Reflective generation failed, using standard generation: {}", e);
                }
                return self.traced_standard_generation(query, &context, started, trace).await;
            }
        };

        let claims = parse_claims(&raw);
        let uncertain_claims = doubtful_claims(&claims);
        let confidence = overall_confidence(&claims);
        let needs_re_retrieval = self.config.needs_re_retrieval(uncertain_claims.len());
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let mut result = ReflectionResult {
            clean_response: clean_response(&raw),
            response: raw,
            claims,
            needs_re_retrieval,
            uncertain_claims,
            confidence,
            metrics: Map::new(),
        };
        result.metrics = claim_metrics(&result, elapsed_ms);

        info!(
            "Reflective generation: {} claims, {} doubtful, confidence {:.2}, re-retrieval={}",
            result.claims.len(),
            result.uncertain_claims.len(),
            confidence,
            needs_re_retrieval
        );
        trace.add_step(
            StepType::Generation,
            "Self-RAG Reflective Generation",
            format!(
                "{} claims ({} supported, {} doubtful), {:.0}% confidence",
                result.claims.len(),
                result.count(ReflectionToken::Supported),
                result.uncertain_claims.len(),
                confidence * 100.0
            ),
            elapsed_ms,
            result.metrics.clone(),
        );

        result
    }

    async fn traced_standard_generation(
        &self,
        query: &str,
        context: &str,
        started: Instant,
        trace: &TraceContext,
    ) -> ReflectionResult {
        let result = self.standard_generation(query, context).await;
        trace.add_step(
            StepType::Generation,
            "Standard Generation",
            format!("Untagged answer, {:.0}% confidence", result.confidence * 100.0),
            started.elapsed().as_millis() as u64,
            result.metrics.clone(),
        );
        result
    }

    /// Single untagged completion at a fixed confidence
    pub async fn standard_generation(&self, query: &str, context: &str) -> ReflectionResult {
        let prompt = format!("Context: {}\n\nQuestion: {}", context, query);
        let mut metrics = Map::new();
        metrics.insert("mode".to_string(), Value::from("standard"));

        match self.completion.complete(None, &prompt).await {
            Ok(text) => ReflectionResult::unreflected(text.trim(), PLAIN_GENERATION_CONFIDENCE, metrics),
            Err(e) => {
                warn!("Standard generation failed: {}", e);
                metrics.insert("error".to_string(), Value::from(e.to_string()));
                ReflectionResult::unreflected(UNABLE_TO_GENERATE_MESSAGE, 0.0, metrics)
            }
        }
    }

    /// Tag the claims of an existing answer against `context`.
    ///
    /// `response` carries the tagged text, `clean_response` the answer as given.
    pub async fn verify_response(&self, response: &str, context: &str) -> ReflectionResult {
        let started = Instant::now();
        let prompt = format!(
            "Analyze this response and verify each claim against the provided context.\n\
             Mark each claim with: [SUPPORTED], [INFERRED], [UNCERTAIN], or [UNSUPPORTED].\n\n\
             RESPONSE TO VERIFY:\n{}\n\nCONTEXT:\n{}\n\n\
             Provide the response with reflection tokens added:\n",
            response, context
        );

        match self.completion.complete(Some(VERIFICATION_SYSTEM_PROMPT), &prompt).await {
            Ok(verified) => {
                let claims = parse_claims(&verified);
                let mut result = ReflectionResult {
                    response: verified,
                    clean_response: response.to_string(),
                    uncertain_claims: doubtful_claims(&claims),
                    confidence: overall_confidence(&claims),
                    claims,
                    needs_re_retrieval: false,
                    metrics: Map::new(),
                };
                result.metrics = claim_metrics(&result, started.elapsed().as_millis() as u64);
                result
                    .metrics
                    .insert("mode".to_string(), Value::from("verification"));
                result
            }
            Err(e) => {
                warn!("Response verification failed, returning it unverified: {}", e);
                let mut metrics = Map::new();
                metrics.insert("mode".to_string(), Value::from("verification"));
                metrics.insert("error".to_string(), Value::from(e.to_string()));
                ReflectionResult::unreflected(response, UNVERIFIED_CONFIDENCE, metrics)
            }
        }
    }
}

fn claim_metrics(result: &ReflectionResult, elapsed_ms: u64) -> Map<String, Value> {
    let mut metrics = Map::new();
    metrics.insert("totalClaims".to_string(), Value::from(result.claims.len()));
    metrics.insert(
        "supportedClaims".to_string(),
        Value::from(result.count(ReflectionToken::Supported)),
    );
    metrics.insert(
        "inferredClaims".to_string(),
        Value::from(result.count(ReflectionToken::Inferred)),
    );
    metrics.insert(
        "uncertainClaims".to_string(),
        Value::from(result.uncertain_claims.len()),
    );
    metrics.insert("confidence".to_string(), Value::from(result.confidence));
    metrics.insert(
        "needsReRetrieval".to_string(),
        Value::from(result.needs_re_retrieval),
    );
    metrics.insert("elapsed".to_string(), Value::from(elapsed_ms));
    metrics
}
