//! Reflective generator configuration

use serde::{Deserialize, Serialize};

pub const REFLECTION_SYSTEM_PROMPT: &str = "You are a self-reflective AI that critically evaluates your own claims.

When answering, mark EACH factual claim with a reflection token:
- [SUPPORTED] Claim directly found in the provided context
- [INFERRED] Claim reasonably deduced from context
- [UNCERTAIN] Claim that may need verification - not fully supported
- [UNSUPPORTED] Claim with no supporting evidence

Example format:
\"[SUPPORTED] The company was founded in 2010. [INFERRED] Based on the growth trajectory,
they likely expanded internationally by 2015. [UNCERTAIN] Their current market share
may be around 15%.\"

Be rigorous: if information isn't in the context, mark it [UNCERTAIN] or [UNSUPPORTED].
";

pub const VERIFICATION_SYSTEM_PROMPT: &str = "You verify claims against provided context.";

/// Configuration for self-reflective generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Re-retrieval is flagged when UNCERTAIN + UNSUPPORTED claims exceed this
    #[serde(default = "default_max_uncertain_claims")]
    pub max_uncertain_claims: usize,
    #[serde(default = "default_true")]
    pub re_retrieve_on_uncertain: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_uncertain_claims() -> usize {
    2
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_uncertain_claims: default_max_uncertain_claims(),
            re_retrieve_on_uncertain: true,
        }
    }
}

impl ReflectionConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_uncertain_claims(mut self, max: usize) -> Self {
        self.max_uncertain_claims = max;
        self
    }

    pub fn with_re_retrieve_on_uncertain(mut self, enabled: bool) -> Self {
        self.re_retrieve_on_uncertain = enabled;
        self
    }

    pub fn needs_re_retrieval(&self, uncertain_count: usize) -> bool {
        self.re_retrieve_on_uncertain && uncertain_count > self.max_uncertain_claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_re_retrieval() {
        let config = ReflectionConfig::default();
        assert!(!config.needs_re_retrieval(2));
        assert!(config.needs_re_retrieval(3));

        let config = config.with_re_retrieve_on_uncertain(false);
        assert!(!config.needs_re_retrieval(10));
    }
}
