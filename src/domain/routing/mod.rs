//! Adaptive query routing domain
//!
//! Routing runs in tiers: a pure lexical fast path, an optional model-backed
//! classifier, then a deterministic heuristic. Each tier is a standalone
//! function here so it can be tested without the others.

mod classifier;
mod config;
mod decision;

pub use classifier::{
    classify_heuristic, compute_signals, document_pattern_matches, match_fast_path,
    parse_route_label, TierOutcome, ROUTER_SYSTEM_PROMPT,
};
pub use config::{RetrievalProfile, RouterConfig, RoutingWeights};
pub use decision::{RoutingDecision, RoutingResult, RoutingSignals, SemanticRouterSignal};
