//! PMP Agentic RAG
//!
//! Decision-and-recovery core for retrieval-augmented answering:
//! - Query routing (skip, paragraph-level or document-level retrieval)
//! - Evidence grading with a four-way go/no-go decision
//! - Query rewriting and hypothesis-driven retrieval
//! - Self-reflective generation with claim-level confidence
//! - A bounded controller loop that never fails a request

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    AgenticResult, DomainError, EvidenceSearch, PipelineStep, SearchParams, SearchResult,
    TraceContext, TraceSink,
};
pub use infrastructure::AgenticController;

use std::sync::Arc;

use infrastructure::observability::{self, PrometheusMetrics};
use infrastructure::{logging, LoggingTraceSink};

/// Load configuration, initialize logging and metrics, and build the controller
/// over the given evidence search backend.
///
/// The metrics handle is `None` when metrics are disabled or a recorder was
/// already installed.
pub fn create_controller(
    search: Arc<dyn EvidenceSearch>,
) -> anyhow::Result<(AgenticController, Option<PrometheusMetrics>)> {
    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    let metrics = observability::init_metrics(&config.metrics);

    let controller = AgenticController::from_config(&config.agentic, search)?
        .with_trace_sink(Arc::new(LoggingTraceSink));

    Ok((controller, metrics))
}
