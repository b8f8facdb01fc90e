//! Hypothesis augmenter
//!
//! Generates a plausible answer, searches with it and with the raw query,
//! and fuses both result lists with hypothesis hits first.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::hyde::{fuse_results, is_suitable_query, HydeConfig, HydeResult, HYDE_SYSTEM_PROMPT};
use crate::domain::knowledge_base::{EvidenceSearch, SearchParams, SearchResult};
use crate::domain::routing::RoutingResult;
use crate::domain::trace::{StepType, TraceContext};
use crate::domain::{DomainError, TextCompletion};
use crate::infrastructure::logging::query_summary;
use crate::infrastructure::observability::record_hyde;

/// Bridges the vocabulary gap between questions and source phrasing
#[derive(Debug, Clone)]
pub struct HypothesisAugmenter {
    config: HydeConfig,
    search: Arc<dyn EvidenceSearch>,
    completion: TextCompletion,
}

impl HypothesisAugmenter {
    pub fn new(config: HydeConfig, search: Arc<dyn EvidenceSearch>, completion: TextCompletion) -> Self {
        Self {
            config,
            search,
            completion,
        }
    }

    pub fn config(&self) -> &HydeConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Whether the router flagged this query for hypothesis-driven retrieval
    pub fn should_use(&self, routing: &RoutingResult) -> bool {
        self.config.enabled && routing.is_hyde()
    }

    pub fn is_suitable(&self, query: &str) -> bool {
        is_suitable_query(query)
    }

    /// Retrieve documents for `query`, scoped by `scope`. Never fails.
    pub async fn retrieve(&self, query: &str, scope: Option<&str>, trace: &TraceContext) -> HydeResult {
        let started = Instant::now();

        if !self.config.enabled {
            let documents = self.plain_search_or_empty(query, scope).await;
            trace.add_step(
                StepType::Retrieval,
                "Standard Retrieval",
                format!("HyDE disabled, plain search found {} documents", documents.len()),
                started.elapsed().as_millis() as u64,
                serde_json::Map::new(),
            );
            return HydeResult::plain(documents, "mode", "disabled");
        }

        let hypothesis = match self.generate_hypothesis(query).await {
            Ok(hypothesis) => hypothesis,
            Err(e) => {
                warn!("Hypothesis generation failed, using plain search: {}", e);
                let documents = self.plain_search_or_empty(query, scope).await;
                record_hyde(false, documents.len());
                trace.add_step(
                    StepType::Retrieval,
                    "HyDE Enhanced Retrieval",
                    format!("Hypothesis unavailable, plain search found {} documents", documents.len()),
                    started.elapsed().as_millis() as u64,
                    serde_json::Map::new(),
                );
                return HydeResult::plain(documents, "fallback", "hypothesis_failed");
            }
        };
        let generation_ms = started.elapsed().as_millis() as u64;
        debug!("Generated hypothesis of {} chars in {}ms", hypothesis.chars().count(), generation_ms);

        let search_started = Instant::now();
        let hyde_hits = self
            .plain_search_or_empty(&hypothesis, scope)
            .await;
        let query_hits = self.plain_search_or_empty(query, scope).await;
        let search_ms = search_started.elapsed().as_millis() as u64;

        let hyde_count = hyde_hits.len();
        let query_count = query_hits.len();
        let documents = fuse_results(hyde_hits, query_hits);
        let total_ms = started.elapsed().as_millis() as u64;

        info!(
            "HyDE retrieval for {}: {} hypothesis hits + {} query hits -> {} fused ({}ms)",
            query_summary(query),
            hyde_count,
            query_count,
            documents.len(),
            total_ms
        );
        record_hyde(true, documents.len());

        let mut metrics = serde_json::Map::new();
        metrics.insert("hypotheticalLength".to_string(), Value::from(hypothesis.chars().count()));
        metrics.insert("hydeResultCount".to_string(), Value::from(hyde_count));
        metrics.insert("standardResultCount".to_string(), Value::from(query_count));
        metrics.insert("fusedResultCount".to_string(), Value::from(documents.len()));
        metrics.insert("hypoGenerationMs".to_string(), Value::from(generation_ms));
        metrics.insert("searchMs".to_string(), Value::from(search_ms));
        metrics.insert("totalMs".to_string(), Value::from(total_ms));

        trace.add_step(
            StepType::Retrieval,
            "HyDE Enhanced Retrieval",
            format!(
                "Hypothesis search found {}, query search found {}, {} after fusion",
                hyde_count,
                query_count,
                documents.len()
            ),
            total_ms,
            metrics.clone(),
        );

        HydeResult {
            documents,
            hypothesis: Some(hypothesis),
            applied: true,
            metrics,
        }
    }

    /// Generate a short hypothetical passage answering `query`
    pub async fn generate_hypothesis(&self, query: &str) -> Result<String, DomainError> {
        let prompt = format!("Question: {}\n\nHypothetical document content:", query);
        let reply = self.completion.complete(Some(HYDE_SYSTEM_PROMPT), &prompt).await?;

        let hypothesis = self.config.clip_hypothesis(reply.trim());
        if hypothesis.trim().is_empty() {
            return Err(DomainError::validation("Empty hypothesis"));
        }

        Ok(hypothesis)
    }

    async fn plain_search_or_empty(&self, text: &str, scope: Option<&str>) -> Vec<SearchResult> {
        let params = SearchParams::new(text)
            .with_top_k(self.config.top_k)
            .with_similarity_threshold(self.config.similarity_threshold)
            .with_scope(scope);

        self.search.search(params).await.unwrap_or_else(|e| {
            warn!("Search failed during HyDE retrieval: {}", e);
            Vec::new()
        })
    }
}
