//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::{CragDecision, RoutingDecision};

/// Prometheus metrics handle for rendering the text exposition format
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("agentic_rag_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Record one routing decision
pub fn record_routing_decision(decision: RoutingDecision, reason: &str) {
    let tier = reason.split(':').next().unwrap_or(reason).trim().to_string();
    let labels = [("decision", decision.as_str().to_string()), ("tier", tier)];

    counter!("rag_routing_decisions_total", &labels).increment(1);
}

/// Record one grading pass
pub fn record_crag_decision(decision: CragDecision, documents: usize, duration: Duration) {
    let labels = [("decision", decision.as_str().to_string())];

    counter!("rag_crag_decisions_total", &labels).increment(1);
    counter!("rag_crag_documents_graded_total").increment(documents as u64);
    histogram!("rag_crag_duration_seconds").record(duration.as_secs_f64());
}

/// Record one rewrite attempt
pub fn record_rewrite(rewritten: bool) {
    let outcome = if rewritten { "rewritten" } else { "unchanged" };
    counter!("rag_query_rewrites_total", "outcome" => outcome).increment(1);
}

/// Record one hypothesis-driven retrieval
pub fn record_hyde(applied: bool, fused_results: usize) {
    let outcome = if applied { "applied" } else { "fallback" };
    counter!("rag_hyde_retrievals_total", "outcome" => outcome).increment(1);
    histogram!("rag_hyde_fused_results").record(fused_results as f64);
}

/// Record the end of one pipeline execution
pub fn record_pipeline_outcome(outcome: &str, iterations: u32, confidence: f64, duration: Duration) {
    let labels = [("outcome", outcome.to_string())];

    counter!("rag_pipeline_executions_total", &labels).increment(1);
    histogram!("rag_pipeline_iterations", &labels).record(iterations as f64);
    histogram!("rag_pipeline_confidence", &labels).record(confidence);
    histogram!("rag_pipeline_duration_seconds", &labels).record(duration.as_secs_f64());
}
