//! Query rewriter
//!
//! Any failure (error, timeout, empty reply) returns the original query, so
//! the controller always has something to retry with.

use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::rewrite::{strip_wrapping_quotes, RewriteConfig, REWRITE_SYSTEM_PROMPT};
use crate::domain::trace::{StepType, TraceContext};
use crate::domain::{DomainError, TextCompletion};
use crate::infrastructure::logging::query_summary;
use crate::infrastructure::observability::record_rewrite;

/// Repairs a query whose retrieval produced nothing usable
#[derive(Debug, Clone)]
pub struct QueryRewriter {
    config: RewriteConfig,
    completion: TextCompletion,
}

impl QueryRewriter {
    pub fn new(config: RewriteConfig, completion: TextCompletion) -> Self {
        Self { config, completion }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrite `query` into a more specific search query
    pub async fn rewrite_query(&self, query: &str, trace: &TraceContext) -> String {
        let started = Instant::now();

        let rewritten = match self.call_model(query).await {
            Ok(reply) => {
                let cleaned = strip_wrapping_quotes(reply.trim()).trim();
                if cleaned.is_empty() {
                    warn!("Rewrite returned an empty query, keeping the original");
                    None
                } else {
                    Some(cleaned.to_string())
                }
            }
            Err(e) => {
                warn!("Query rewrite failed, keeping the original: {}", e);
                None
            }
        };

        let changed = rewritten.as_deref().is_some_and(|r| r != query);
        let result = rewritten.unwrap_or_else(|| query.to_string());
        let duration_ms = started.elapsed().as_millis() as u64;

        info!(
            "Rewrote {} -> {} ({}ms)",
            query_summary(query),
            query_summary(&result),
            duration_ms
        );
        record_rewrite(changed);

        let mut data = Map::new();
        data.insert("original".to_string(), Value::from(query));
        data.insert("rewritten".to_string(), Value::from(result.as_str()));
        data.insert("changed".to_string(), Value::from(changed));
        trace.add_step(
            StepType::QueryRewrite,
            "Query Rewrite",
            format!("'{}' -> '{}'", query, result),
            duration_ms,
            data,
        );

        result
    }

    async fn call_model(&self, query: &str) -> Result<String, DomainError> {
        let call = self.completion.complete(Some(REWRITE_SYSTEM_PROMPT), query);

        match self.config.timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(Duration::from_millis(timeout_ms), call)
                .await
                .map_err(|_| DomainError::timeout("query rewrite", timeout_ms))?,
            None => call.await,
        }
    }
}
