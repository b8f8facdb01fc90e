//! Router configuration

use serde::{Deserialize, Serialize};

use super::decision::RoutingDecision;

/// Search breadth for one routing decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalProfile {
    pub top_k: u32,
    pub similarity_threshold: f32,
}

impl RetrievalProfile {
    pub fn new(top_k: u32, similarity_threshold: f32) -> Self {
        Self {
            top_k,
            similarity_threshold: similarity_threshold.clamp(0.0, 1.0),
        }
    }
}

/// Confidence assigned by each routing tier.
///
/// These are tuning constants without a derivation; they are kept
/// configurable rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingWeights {
    #[serde(default = "default_conversational")]
    pub conversational: f64,
    #[serde(default = "default_factual")]
    pub factual: f64,
    #[serde(default = "default_semantic")]
    pub semantic: f64,
    #[serde(default = "default_heuristic_document")]
    pub heuristic_document: f64,
    #[serde(default = "default_heuristic_chunk")]
    pub heuristic_chunk: f64,
    /// Added per document-level pattern match beyond the first
    #[serde(default = "default_extra_match_bonus")]
    pub extra_match_bonus: f64,
    #[serde(default = "default_confidence_cap")]
    pub confidence_cap: f64,
}

fn default_conversational() -> f64 {
    0.99
}

fn default_factual() -> f64 {
    0.95
}

fn default_semantic() -> f64 {
    0.9
}

fn default_heuristic_document() -> f64 {
    0.7
}

fn default_heuristic_chunk() -> f64 {
    0.75
}

fn default_extra_match_bonus() -> f64 {
    0.05
}

fn default_confidence_cap() -> f64 {
    0.99
}

impl Default for RoutingWeights {
    fn default() -> Self {
        Self {
            conversational: default_conversational(),
            factual: default_factual(),
            semantic: default_semantic(),
            heuristic_document: default_heuristic_document(),
            heuristic_chunk: default_heuristic_chunk(),
            extra_match_bonus: default_extra_match_bonus(),
            confidence_cap: default_confidence_cap(),
        }
    }
}

/// Configuration for the query router
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Consult the language model when no fast path matches
    #[serde(default)]
    pub semantic_router_enabled: bool,
    #[serde(default = "default_chunk_profile")]
    pub chunk: RetrievalProfile,
    #[serde(default = "default_document_profile")]
    pub document: RetrievalProfile,
    /// Queries longer than this many words route to DOCUMENT in the heuristic tier
    #[serde(default = "default_long_query_words")]
    pub long_query_words: usize,
    #[serde(default)]
    pub weights: RoutingWeights,
}

fn default_true() -> bool {
    true
}

fn default_chunk_profile() -> RetrievalProfile {
    RetrievalProfile::new(5, 0.2)
}

fn default_document_profile() -> RetrievalProfile {
    RetrievalProfile::new(3, 0.1)
}

fn default_long_query_words() -> usize {
    15
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            semantic_router_enabled: false,
            chunk: default_chunk_profile(),
            document: default_document_profile(),
            long_query_words: default_long_query_words(),
            weights: RoutingWeights::default(),
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_semantic_router(mut self, enabled: bool) -> Self {
        self.semantic_router_enabled = enabled;
        self
    }

    pub fn with_chunk_profile(mut self, top_k: u32, threshold: f32) -> Self {
        self.chunk = RetrievalProfile::new(top_k, threshold);
        self
    }

    pub fn with_document_profile(mut self, top_k: u32, threshold: f32) -> Self {
        self.document = RetrievalProfile::new(top_k, threshold);
        self
    }

    pub fn with_weights(mut self, weights: RoutingWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Number of results to request for a decision
    pub fn top_k(&self, decision: RoutingDecision) -> u32 {
        match decision {
            RoutingDecision::NoRetrieval => 0,
            RoutingDecision::Chunk => self.chunk.top_k,
            RoutingDecision::Document => self.document.top_k,
        }
    }

    /// Minimum similarity to request for a decision
    pub fn similarity_threshold(&self, decision: RoutingDecision) -> f32 {
        match decision {
            RoutingDecision::NoRetrieval => 0.0,
            RoutingDecision::Chunk => self.chunk.similarity_threshold,
            RoutingDecision::Document => self.document.similarity_threshold,
        }
    }
}
