//! Lexical routing tiers

use once_cell::sync::Lazy;
use regex::Regex;

use super::config::{RouterConfig, RoutingWeights};
use super::decision::{RoutingDecision, RoutingSignals};

pub const ROUTER_SYSTEM_PROMPT: &str = "You are an expert query router for a RAG system.
Classify the USER QUERY into one of these categories:

1. NO_RETRIEVAL: ONLY for greetings (hi, thanks, bye) or meta-questions about the assistant itself.
   NEVER use this for definitional questions like \"What is X?\" - those need retrieval!
2. CHUNK: Specific factual questions, definitions, looking up terms, numbers, dates, or entities.
   Examples: \"What is RAG?\", \"What does X mean?\", \"Define Y\", \"Who is Z?\"
3. DOCUMENT: Complex analysis, summarization, comparisons, or broad \"how does X work\" questions.

IMPORTANT: When in doubt between NO_RETRIEVAL and CHUNK, choose CHUNK.
Definitional questions (What is X?) should ALWAYS be CHUNK, never NO_RETRIEVAL.

Return ONLY the category name. Do not explain.
";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
}

static CONVERSATIONAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)^(hi|hello|hey|greetings|good\s+(morning|afternoon|evening))\b",
        r"(?i)^(thanks|thank\s+you|thx)\b",
        r"(?i)^(bye|goodbye|see\s+you|later)\b",
        r"(?i)^(yes|no|ok|okay|sure|fine|great|good)\s*[.!?]?$",
        r"(?i)^(what|who)\s+(are|is)\s+you\b",
        r"(?i)^can\s+you\s+(help|assist)\b",
        r"(?i)^(please\s+)?(clarify|explain\s+yourself|what\s+do\s+you\s+mean)",
    ])
});

static FACTUAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)^what\s+is\s+\w+",
        r"(?i)\b(what\s+is|what's)\s+(the|a)\s+\w+\b",
        r"(?i)\b(when\s+(did|was|is|will))\b",
        r"(?i)\b(where\s+(is|are|was|were))\b",
        r"(?i)\b(who\s+(is|was|are|were))\b",
        r"(?i)\b(how\s+much|how\s+many|how\s+long|how\s+often)\b",
        r"(?i)\b(define|definition\s+of)\b",
        r"(?i)\b(list|name|enumerate)\s+(the|all|some)\b",
        r"(?i)\b(find|locate|identify)\s+(the|a|any)\b",
        r"\b\d{4}\b",
        r"(?i)\$[\d,.]+|\d+%|\d+\s*(million|billion|thousand)",
    ])
});

static DOCUMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(summarize|summary|overview|abstract)\b",
        r"(?i)\b(compare|contrast|difference|similarities)\b",
        r"(?i)\b(analyze|analysis|evaluate|assessment)\b",
        r"(?i)\b(explain|describe|elaborate)\s+(in\s+detail|thoroughly|comprehensively)",
        r"(?i)\b(overall|big\s+picture|holistic|comprehensive)\b",
        r"(?i)\b(relationship|connection|correlation)\s+between\b",
        r"(?i)\b(how\s+does|how\s+do)\s+.{5,}\s+(work|function|operate|relate)",
        r"(?i)\b(impact|effect|consequence|implication)s?\s+of\b",
        r"(?i)\b(pros?\s+and\s+cons?|advantages?\s+and\s+disadvantages?)\b",
        r"(?i)\b(timeline|history|evolution|progression)\b",
        r"(?i)\b(strategy|approach|methodology|framework)\b",
    ])
});

static HYDE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(that\s+one|the\s+thing|something\s+about)\b",
        r"(?i)\b(concept|idea|approach)\s+(like|similar|related)\b",
        r"(?i)\b(remember|recall|forgot)\s+(the|a|about)\b",
    ])
});

static MULTI_HOP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(how\s+does?)\s+.+?\s+(affect|impact|influence|cause)\b",
        r"(?i)\brelationship\s+between\b",
        r"(?i)\b(chain|cascade|sequence)\s+of\b",
        r"(?i)\b(who|what|where|when)\b.+\band\s+(what|who|how|its|their|the)\b",
        r"(?i)\bcompare\b.+\b(with|to|and)\b",
    ])
});

// Case-sensitive: capitalized multi-word phrase or an all-caps acronym.
static NAMED_ENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+\s+){1,3}[A-Z][a-z]+\b|\b[A-Z]{2,}\b").unwrap()
});

static ROUTE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(NO[_\s-]?RETRIEVAL|DOCUMENT|CHUNK)\b").unwrap()
});

fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

/// Decision produced by one routing tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierOutcome {
    pub decision: RoutingDecision,
    pub reason: String,
    pub confidence: f64,
}

impl TierOutcome {
    fn new(decision: RoutingDecision, reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            decision,
            reason: reason.into(),
            confidence,
        }
    }
}

/// Compute the lexical signals of a trimmed, non-empty query
pub fn compute_signals(query: &str) -> RoutingSignals {
    RoutingSignals {
        word_count: query.split_whitespace().count(),
        has_question_mark: query.contains('?'),
        is_hyde: any_match(&HYDE_PATTERNS, query),
        is_multi_hop: any_match(&MULTI_HOP_PATTERNS, query),
        has_named_entity: NAMED_ENTITY_PATTERN.is_match(query),
        semantic_router: None,
    }
}

/// Tier 1: conversational queries skip retrieval, definitional/factual ones go to CHUNK.
///
/// Conversational patterns are checked first; a factual match can never
/// yield NO_RETRIEVAL.
pub fn match_fast_path(query: &str, weights: &RoutingWeights) -> Option<TierOutcome> {
    if any_match(&CONVERSATIONAL_PATTERNS, query) {
        return Some(TierOutcome::new(
            RoutingDecision::NoRetrieval,
            "FastPath: Conversational pattern",
            weights.conversational,
        ));
    }

    if any_match(&FACTUAL_PATTERNS, query) {
        return Some(TierOutcome::new(
            RoutingDecision::Chunk,
            "FastPath: Definitional/factual pattern",
            weights.factual,
        ));
    }

    None
}

/// Count how many document-level analysis patterns a query matches
pub fn document_pattern_matches(query: &str) -> usize {
    DOCUMENT_PATTERNS.iter().filter(|p| p.is_match(query)).count()
}

/// Tier 3: analysis vocabulary or a long query routes to DOCUMENT, anything else to CHUNK
pub fn classify_heuristic(query: &str, word_count: usize, config: &RouterConfig) -> TierOutcome {
    let weights = &config.weights;
    let matches = document_pattern_matches(query);
    let is_long_query = word_count > config.long_query_words;

    if matches >= 1 || is_long_query {
        let bonus = weights.extra_match_bonus * matches.saturating_sub(1) as f64;
        let confidence = (weights.heuristic_document + bonus).min(weights.confidence_cap);

        TierOutcome::new(
            RoutingDecision::Document,
            "Heuristic: Complex pattern or length",
            confidence,
        )
    } else {
        TierOutcome::new(
            RoutingDecision::Chunk,
            "Heuristic: Default factual",
            weights.heuristic_chunk,
        )
    }
}

/// Parse the first routing label in a model reply, case-insensitively
pub fn parse_route_label(text: &str) -> Option<RoutingDecision> {
    let label = ROUTE_LABEL.find(text)?.as_str().to_ascii_uppercase();

    if label.starts_with("NO") {
        Some(RoutingDecision::NoRetrieval)
    } else if label == "DOCUMENT" {
        Some(RoutingDecision::Document)
    } else {
        Some(RoutingDecision::Chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(query: &str) -> Option<TierOutcome> {
        match_fast_path(query, &RoutingWeights::default())
    }

    #[test]
    fn test_greetings_skip_retrieval() {
        for query in ["Hello", "Thanks", "Bye", "Yes", "good morning team", "Who are you?"] {
            let outcome = fast(query).unwrap();
            assert_eq!(outcome.decision, RoutingDecision::NoRetrieval, "{query}");
            assert!(outcome.confidence >= 0.95);
        }
    }

    #[test]
    fn test_definitional_questions_go_to_chunk() {
        for query in [
            "What is the total program budget?",
            "What is RAG",
            "Define escalation threshold",
            "When did the contract start?",
            "How many vendors signed in 2023",
            "Spend was $4,500 last month",
        ] {
            let outcome = fast(query).unwrap();
            assert_eq!(outcome.decision, RoutingDecision::Chunk, "{query}");
            assert!(outcome.confidence >= 0.90);
        }
    }

    #[test]
    fn test_no_fast_path_for_analysis() {
        assert!(fast("Summarize the entire quarterly report").is_none());
    }

    #[test]
    fn test_signals() {
        let signals = compute_signals("How does the Acme Corp merger affect NASA contracts?");

        assert_eq!(signals.word_count, 9);
        assert!(signals.has_question_mark);
        assert!(signals.is_multi_hop);
        assert!(signals.has_named_entity);
        assert!(!signals.is_hyde);
    }

    #[test]
    fn test_hyde_signal() {
        let signals = compute_signals("I remember the thing about reimbursement caps");
        assert!(signals.is_hyde);
        assert!(!signals.has_named_entity);
    }

    #[test]
    fn test_heuristic_document_patterns() {
        let config = RouterConfig::default();
        let outcome = classify_heuristic("Summarize the entire quarterly report", 5, &config);

        assert_eq!(outcome.decision, RoutingDecision::Document);
        assert!((outcome.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_bonus_per_extra_match_is_capped() {
        let query = "Summarize and compare the overall strategy timeline analysis";
        assert!(document_pattern_matches(query) >= 5);

        let config = RouterConfig::default();
        let outcome = classify_heuristic(query, 8, &config);
        let expected = 0.7 + 0.05 * (document_pattern_matches(query) - 1) as f64;
        assert!((outcome.confidence - expected.min(0.99)).abs() < 1e-9);

        let mut config = RouterConfig::default();
        config.weights.extra_match_bonus = 0.5;
        let outcome = classify_heuristic(query, 8, &config);
        assert!((outcome.confidence - 0.99).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_long_query() {
        let query = "Our team keeps running into trouble with the quarterly vendor onboarding \
                     process and nobody seems sure which forms are required";
        let words = query.split_whitespace().count();
        assert!(words > 15);
        assert!(fast(query).is_none());

        let outcome = classify_heuristic(query, words, &RouterConfig::default());
        assert_eq!(outcome.decision, RoutingDecision::Document);
    }

    #[test]
    fn test_heuristic_default_chunk() {
        let outcome = classify_heuristic("vendor onboarding forms", 3, &RouterConfig::default());
        assert_eq!(outcome.decision, RoutingDecision::Chunk);
        assert!((outcome.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_parse_route_label() {
        assert_eq!(parse_route_label("CHUNK"), Some(RoutingDecision::Chunk));
        assert_eq!(parse_route_label("  document\n"), Some(RoutingDecision::Document));
        assert_eq!(
            parse_route_label("Category: no_retrieval."),
            Some(RoutingDecision::NoRetrieval)
        );
        assert_eq!(
            parse_route_label("I'd say DOCUMENT, maybe CHUNK"),
            Some(RoutingDecision::Document)
        );
        assert_eq!(parse_route_label("I cannot decide"), None);
        assert_eq!(parse_route_label(""), None);
    }
}
