//! Tiered query router
//!
//! Precedence: disabled, empty query, conversational fast path, factual fast
//! path, optional semantic classifier, heuristic. Every branch appends one
//! routing step to the trace.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::routing::{
    classify_heuristic, compute_signals, match_fast_path, parse_route_label, RouterConfig,
    RoutingDecision, RoutingResult, RoutingSignals, SemanticRouterSignal, TierOutcome,
    ROUTER_SYSTEM_PROMPT,
};
use crate::domain::trace::{StepType, TraceContext};
use crate::domain::TextCompletion;
use crate::infrastructure::logging::query_summary;
use crate::infrastructure::observability::record_routing_decision;

/// Result of consulting the model-backed tier
enum SemanticTier {
    Decided(TierOutcome, SemanticRouterSignal),
    FellThrough(SemanticRouterSignal),
}

/// Classifies a query into a retrieval strategy before any search happens
#[derive(Debug, Clone)]
pub struct QueryRouter {
    config: RouterConfig,
    completion: Option<TextCompletion>,
}

impl QueryRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            completion: None,
        }
    }

    /// Model used by the semantic tier when it is enabled
    pub fn with_completion(mut self, completion: TextCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn top_k(&self, decision: RoutingDecision) -> u32 {
        self.config.top_k(decision)
    }

    pub fn similarity_threshold(&self, decision: RoutingDecision) -> f32 {
        self.config.similarity_threshold(decision)
    }

    pub fn should_skip_retrieval(&self, decision: RoutingDecision) -> bool {
        decision == RoutingDecision::NoRetrieval
    }

    /// Route one query. Never fails; collaborator errors fall through to the heuristic tier.
    pub async fn route(&self, query: &str, trace: &TraceContext) -> RoutingResult {
        let started = Instant::now();

        if !self.config.enabled {
            debug!("Adaptive routing disabled, defaulting to CHUNK retrieval");
            let result = RoutingResult::new(RoutingDecision::Chunk, "Adaptive routing disabled", 1.0);
            return self.finish(result, started, trace);
        }

        let query = query.trim();
        if query.is_empty() {
            let result = RoutingResult::new(RoutingDecision::NoRetrieval, "Empty query", 1.0);
            return self.finish(result, started, trace);
        }

        let signals = compute_signals(query);
        if signals.is_hyde || signals.is_multi_hop {
            debug!(
                "Routing signals: hyde={}, multi_hop={}, named_entity={}",
                signals.is_hyde, signals.is_multi_hop, signals.has_named_entity
            );
        }

        if let Some(outcome) = match_fast_path(query, &self.config.weights) {
            return self.finish(into_result(outcome, signals), started, trace);
        }

        let signals = match self.semantic_tier(query).await {
            SemanticTier::Decided(outcome, signal) => {
                let result = into_result(outcome, signals.with_semantic(signal));
                return self.finish(result, started, trace);
            }
            SemanticTier::FellThrough(signal) => signals.with_semantic(signal),
        };

        let outcome = classify_heuristic(query, signals.word_count, &self.config);
        self.finish(into_result(outcome, signals), started, trace)
    }

    async fn semantic_tier(&self, query: &str) -> SemanticTier {
        let completion = match (&self.completion, self.config.semantic_router_enabled) {
            (Some(completion), true) => completion,
            (None, true) => {
                warn!("Semantic router enabled without a completion model, skipping");
                return SemanticTier::FellThrough(SemanticRouterSignal::Disabled);
            }
            _ => return SemanticTier::FellThrough(SemanticRouterSignal::Disabled),
        };

        let started = Instant::now();
        match completion.complete(Some(ROUTER_SYSTEM_PROMPT), query).await {
            Ok(reply) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                let weights = &self.config.weights;

                let outcome = match parse_route_label(&reply) {
                    Some(RoutingDecision::NoRetrieval) => TierOutcome {
                        decision: RoutingDecision::NoRetrieval,
                        reason: "Semantic Classification: Conversational/Logic".to_string(),
                        confidence: weights.semantic,
                    },
                    Some(RoutingDecision::Document) => TierOutcome {
                        decision: RoutingDecision::Document,
                        reason: "Semantic Classification: Analysis required".to_string(),
                        confidence: weights.semantic,
                    },
                    Some(RoutingDecision::Chunk) => TierOutcome {
                        decision: RoutingDecision::Chunk,
                        reason: "Semantic Classification: Factual".to_string(),
                        confidence: weights.semantic,
                    },
                    None => {
                        warn!("Semantic router reply had no category label, defaulting to CHUNK");
                        TierOutcome {
                            decision: RoutingDecision::Chunk,
                            reason: "Semantic Classification: Unrecognized reply".to_string(),
                            confidence: weights.heuristic_chunk,
                        }
                    }
                };

                SemanticTier::Decided(outcome, SemanticRouterSignal::Classified { duration_ms })
            }
            Err(e) => {
                error!("Semantic router failed, falling back to heuristics: {}", e);
                SemanticTier::FellThrough(SemanticRouterSignal::Failed {
                    error: e.to_string(),
                })
            }
        }
    }

    fn finish(&self, result: RoutingResult, started: Instant, trace: &TraceContext) -> RoutingResult {
        let duration_ms = started.elapsed().as_millis() as u64;

        info!(
            "Routed {} to {} ({}ms) - {}",
            query_summary(trace.query()),
            result.decision,
            duration_ms,
            result.reason
        );
        record_routing_decision(result.decision, &result.reason);

        let mut data = result.signal_map();
        data.insert("decision".to_string(), Value::from(result.decision.as_str()));
        data.insert("reason".to_string(), Value::from(result.reason.as_str()));
        trace.add_step(
            StepType::QueryRouting,
            "Query Routing",
            format!("{}: {}", result.decision, result.reason),
            duration_ms,
            data,
        );

        result
    }
}

fn into_result(outcome: TierOutcome, signals: RoutingSignals) -> RoutingResult {
    RoutingResult::new(outcome.decision, outcome.reason, outcome.confidence).with_signals(signals)
}
