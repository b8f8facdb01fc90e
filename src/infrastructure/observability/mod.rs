//! Observability infrastructure - Prometheus metrics for pipeline decisions

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    init_metrics, record_crag_decision, record_hyde, record_pipeline_outcome, record_rewrite,
    record_routing_decision, PrometheusMetrics,
};
