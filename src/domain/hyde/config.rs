//! Hypothesis augmenter configuration

use serde::{Deserialize, Serialize};

pub const HYDE_SYSTEM_PROMPT: &str = "You are an expert knowledge assistant. Given a user question,
generate a hypothetical answer that an ideal document would contain.

Rules:
1. Write as if you are the document being searched for
2. Use domain-specific terminology that would appear in authoritative sources
3. Be factual in tone, even if you're making up the answer
4. Keep the response to 2-3 sentences
5. Do NOT say \"I don't know\" - generate a plausible answer

This hypothetical answer will be used for semantic search, so include
keywords and concepts that would appear in real documents.
";

const VAGUE_REFERENCES: &[&str] = &["that one", "the thing", "something about", "remember"];
const ABSTRACT_TERMS: &[&str] = &["concept", "idea", "approach", "theory"];

/// Configuration for hypothesis-driven retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Results requested from each of the two searches
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Target hypothesis length; replies longer than twice this are cut
    #[serde(default = "default_hypothetical_length")]
    pub hypothetical_length: usize,
}

fn default_true() -> bool {
    true
}

fn default_top_k() -> u32 {
    10
}

fn default_similarity_threshold() -> f32 {
    0.25
}

fn default_hypothetical_length() -> usize {
    150
}

impl Default for HydeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
            hypothetical_length: default_hypothetical_length(),
        }
    }
}

impl HydeConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_hypothetical_length(mut self, length: usize) -> Self {
        self.hypothetical_length = length;
        self
    }

    /// Longest hypothesis kept, in characters
    pub fn max_hypothesis_chars(&self) -> usize {
        self.hypothetical_length.saturating_mul(2)
    }

    /// Cut a generated hypothesis to the configured maximum
    pub fn clip_hypothesis(&self, text: &str) -> String {
        text.chars().take(self.max_hypothesis_chars()).collect()
    }
}

/// Whether a query reads like it would benefit from a generated hypothesis:
/// vague references, abstract terms, or three words or fewer.
pub fn is_suitable_query(query: &str) -> bool {
    let lower = query.to_lowercase();

    if VAGUE_REFERENCES.iter().any(|p| lower.contains(p)) {
        return true;
    }
    if ABSTRACT_TERMS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    query.split_whitespace().count() <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HydeConfig::default();

        assert!(config.enabled);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.similarity_threshold, 0.25);
        assert_eq!(config.max_hypothesis_chars(), 300);
    }

    #[test]
    fn test_clip_hypothesis() {
        let config = HydeConfig::default().with_hypothetical_length(3);
        assert_eq!(config.clip_hypothesis("abcdefghij"), "abcdef");
        assert_eq!(config.clip_hypothesis("abc"), "abc");
    }

    #[test]
    fn test_suitable_queries() {
        assert!(is_suitable_query("that one policy about travel"));
        assert!(is_suitable_query("Do you remember the onboarding memo"));
        assert!(is_suitable_query("the approach we took for vendor audits last year"));
        assert!(is_suitable_query("travel caps"));
        assert!(!is_suitable_query("What is the total program budget for 2024?"));
    }
}
