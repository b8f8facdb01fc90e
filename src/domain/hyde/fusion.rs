//! Result fusion for dual search

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::knowledge_base::SearchResult;

/// Outcome of one hypothesis-driven retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydeResult {
    pub documents: Vec<SearchResult>,
    /// Generated hypothesis, absent when generation was skipped or failed
    pub hypothesis: Option<String>,
    pub applied: bool,
    pub metrics: Map<String, Value>,
}

impl HydeResult {
    /// Plain search result without a hypothesis
    pub fn plain(documents: Vec<SearchResult>, mode_key: &str, mode: &str) -> Self {
        let mut metrics = Map::new();
        metrics.insert(mode_key.to_string(), Value::from(mode));

        Self {
            documents,
            hypothesis: None,
            applied: false,
            metrics,
        }
    }
}

/// Stable union keyed on source plus content hash; the first list wins on collisions
pub fn fuse_results(
    hypothesis_hits: Vec<SearchResult>,
    query_hits: Vec<SearchResult>,
) -> Vec<SearchResult> {
    let mut seen = HashSet::new();

    hypothesis_hits
        .into_iter()
        .chain(query_hits)
        .filter(|doc| seen.insert(doc.identity_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, source: &str, content: &str) -> SearchResult {
        SearchResult::new(id, content, 0.5).with_source(source)
    }

    #[test]
    fn test_hypothesis_hits_take_priority() {
        let fused = fuse_results(
            vec![doc("h1", "a.pdf", "shared"), doc("h2", "b.pdf", "only hyde")],
            vec![doc("q1", "a.pdf", "shared"), doc("q2", "c.pdf", "only query")],
        );

        let ids: Vec<&str> = fused.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "h2", "q2"]);
    }

    #[test]
    fn test_same_content_different_source_kept() {
        let fused = fuse_results(
            vec![doc("h1", "a.pdf", "shared")],
            vec![doc("q1", "b.pdf", "shared")],
        );
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn test_duplicates_within_one_list_collapse() {
        let fused = fuse_results(
            vec![doc("h1", "a.pdf", "x"), doc("h2", "a.pdf", "x")],
            Vec::new(),
        );
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].id, "h1");
    }
}
