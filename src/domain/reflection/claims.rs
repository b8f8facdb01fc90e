//! Reflection marker grammar

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::knowledge_base::SearchResult;

static SUPPORTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[SUPPORTED\]\s*([^\[]+)").unwrap());
static INFERRED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[INFERRED\]\s*([^\[]+)").unwrap());
static UNCERTAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[UNCERTAIN\]\s*([^\[]+)").unwrap());
static UNSUPPORTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[UNSUPPORTED\]\s*([^\[]+)").unwrap());
static ANY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[(SUPPORTED|INFERRED|UNCERTAIN|UNSUPPORTED)\]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Support level attached to one generated claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReflectionToken {
    Supported,
    Inferred,
    Uncertain,
    Unsupported,
}

impl ReflectionToken {
    pub const ALL: [ReflectionToken; 4] = [
        Self::Supported,
        Self::Inferred,
        Self::Uncertain,
        Self::Unsupported,
    ];

    /// Fixed confidence weight of a claim carrying this token
    pub fn weight(&self) -> f64 {
        match self {
            Self::Supported => 0.95,
            Self::Inferred => 0.75,
            Self::Uncertain => 0.4,
            Self::Unsupported => 0.1,
        }
    }

    /// Whether the claim counts against the answer
    pub fn is_doubtful(&self) -> bool {
        matches!(self, Self::Uncertain | Self::Unsupported)
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Supported => &*SUPPORTED,
            Self::Inferred => &*INFERRED,
            Self::Uncertain => &*UNCERTAIN,
            Self::Unsupported => &*UNSUPPORTED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectedClaim {
    pub claim: String,
    pub token: ReflectionToken,
    pub confidence: f64,
}

/// Extract claims per marker type.
///
/// Each marker is scanned independently, so claims are grouped by token in
/// the order SUPPORTED, INFERRED, UNCERTAIN, UNSUPPORTED rather than in
/// reading order. A claim runs from its marker to the next `[`.
pub fn parse_claims(response: &str) -> Vec<ReflectedClaim> {
    ReflectionToken::ALL
        .into_iter()
        .flat_map(|token| {
            token.pattern().captures_iter(response).filter_map(move |caps| {
                let claim = caps.get(1)?.as_str().trim();
                (!claim.is_empty()).then(|| ReflectedClaim {
                    claim: claim.to_string(),
                    token,
                    confidence: token.weight(),
                })
            })
        })
        .collect()
}

/// Remove every marker and collapse whitespace
pub fn clean_response(response: &str) -> String {
    let stripped = ANY_TOKEN.replace_all(response, "");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Mean claim weight, or 0.5 when there are no claims
pub fn overall_confidence(claims: &[ReflectedClaim]) -> f64 {
    if claims.is_empty() {
        return 0.5;
    }

    claims.iter().map(|c| c.confidence).sum::<f64>() / claims.len() as f64
}

/// Numbered context block handed to the generator
pub fn build_context(documents: &[SearchResult]) -> String {
    if documents.is_empty() {
        return "[No context provided]".to_string();
    }

    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("[Document {}]\n{}\n\n", i + 1, doc.content))
        .collect()
}

/// Outcome of one reflective generation or verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionResult {
    /// Raw response with markers, kept for audit
    pub response: String,
    /// Response for display, markers removed
    pub clean_response: String,
    pub claims: Vec<ReflectedClaim>,
    pub needs_re_retrieval: bool,
    pub uncertain_claims: Vec<String>,
    pub confidence: f64,
    pub metrics: Map<String, Value>,
}

impl ReflectionResult {
    /// Response produced without markers at a fixed confidence
    pub fn unreflected(response: impl Into<String>, confidence: f64, metrics: Map<String, Value>) -> Self {
        let response = response.into();
        Self {
            clean_response: response.clone(),
            response,
            claims: Vec::new(),
            needs_re_retrieval: false,
            uncertain_claims: Vec::new(),
            confidence,
            metrics,
        }
    }

    pub fn count(&self, token: ReflectionToken) -> usize {
        self.claims.iter().filter(|c| c.token == token).count()
    }
}

/// Texts of the UNCERTAIN and UNSUPPORTED claims
pub(crate) fn doubtful_claims(claims: &[ReflectedClaim]) -> Vec<String> {
    claims
        .iter()
        .filter(|c| c.token.is_doubtful())
        .map(|c| c.claim.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGGED: &str = "[SUPPORTED] The budget is $4M. [UNCERTAIN] It may grow next year.\n\n\
                          [SUPPORTED]   The program started in 2021.";

    #[test]
    fn test_parse_and_score() {
        let claims = parse_claims(TAGGED);

        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].token, ReflectionToken::Supported);
        assert_eq!(claims[0].claim, "The budget is $4M.");
        assert_eq!(claims[1].claim, "The program started in 2021.");
        assert_eq!(claims[2].token, ReflectionToken::Uncertain);

        let expected = (0.95 + 0.95 + 0.4) / 3.0;
        assert!((overall_confidence(&claims) - expected).abs() < 1e-9);
        assert_eq!(doubtful_claims(&claims), vec!["It may grow next year."]);
    }

    #[test]
    fn test_clean_response_has_no_markers() {
        let clean = clean_response(TAGGED);

        assert!(!clean.contains('['));
        assert_eq!(
            clean,
            "The budget is $4M. It may grow next year. The program started in 2021."
        );
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let claims = parse_claims("[inferred] Probably fine. [Unsupported] Wild guess.");

        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].token, ReflectionToken::Inferred);
        assert_eq!(claims[1].token, ReflectionToken::Unsupported);
        assert_eq!(clean_response("[inferred] Probably fine."), "Probably fine.");
    }

    #[test]
    fn test_supported_does_not_match_unsupported() {
        let claims = parse_claims("[UNSUPPORTED] No evidence.");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].token, ReflectionToken::Unsupported);
    }

    #[test]
    fn test_untagged_text_is_neutral() {
        let claims = parse_claims("Plain answer with no markers.");
        assert!(claims.is_empty());
        assert_eq!(overall_confidence(&claims), 0.5);
    }

    #[test]
    fn test_build_context() {
        assert_eq!(build_context(&[]), "[No context provided]");

        let docs = vec![SearchResult::new("a", "alpha", 0.9), SearchResult::new("b", "beta", 0.8)];
        assert_eq!(
            build_context(&docs),
            "[Document 1]\nalpha\n\n[Document 2]\nbeta\n\n"
        );
    }
}
