//! Query rewrite configuration and reply cleanup

use serde::{Deserialize, Serialize};

pub const REWRITE_SYSTEM_PROMPT: &str = "You are a query refinement expert for a semantic search engine.
The user's previous query yielded poor results.

Your task:
1. Analyze the query for ambiguity or lack of specificity.
2. Rewrite the query to be more precise, using keywords likely to appear in a knowledge base.
3. Do not change the underlying intent.
4. Return ONLY the rewritten query. No explanations.

Example:
Input: \"bank money safety\"
Output: \"FDIC insurance limits and bank solvency regulations\"
";

/// Configuration for query rewriting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Upper bound on one rewrite call; `None` waits for the provider
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: Option<u64>,
}

fn default_timeout_ms() -> Option<u64> {
    Some(2000)
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RewriteConfig {
    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Remove one pair of double quotes wrapping the whole text
pub fn strip_wrapping_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}
