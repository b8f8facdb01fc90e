//! Retrieved document type

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A ranked document returned by evidence search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique identifier of the document/chunk
    pub id: String,
    /// Content text
    pub content: String,
    /// Similarity score (0.0 - 1.0, higher is more similar)
    pub score: f32,
    /// Document metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Source document reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            metadata: HashMap::new(),
            source: None,
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Set source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Source identifier, from the dedicated field or the `source` metadata entry
    pub fn source_id(&self) -> Option<String> {
        if let Some(source) = &self.source {
            return Some(source.clone());
        }

        self.metadata.get("source").map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Identity used to deduplicate results across searches: source plus content hash
    pub fn identity_key(&self) -> String {
        let digest = Sha256::digest(self.content.as_bytes());
        format!(
            "{}_{}",
            self.source_id().unwrap_or_default(),
            hex::encode(&digest[..8])
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_prefers_field() {
        let doc = SearchResult::new("d1", "text", 0.9)
            .with_source("report.pdf")
            .with_metadata("source", serde_json::json!("other.pdf"));

        assert_eq!(doc.source_id(), Some("report.pdf".to_string()));
    }

    #[test]
    fn test_source_id_from_metadata() {
        let doc = SearchResult::new("d1", "text", 0.9)
            .with_metadata("source", serde_json::json!("memo.docx"));

        assert_eq!(doc.source_id(), Some("memo.docx".to_string()));
    }

    #[test]
    fn test_identity_key_ignores_id_and_score() {
        let a = SearchResult::new("chunk-1", "Budget is $4M", 0.9).with_source("plan.pdf");
        let b = SearchResult::new("chunk-9", "Budget is $4M", 0.4).with_source("plan.pdf");
        let c = SearchResult::new("chunk-1", "Budget is $5M", 0.9).with_source("plan.pdf");

        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(a.identity_key(), c.identity_key());
    }

    #[test]
    fn test_identity_key_distinguishes_sources() {
        let a = SearchResult::new("1", "same", 0.5).with_source("a.pdf");
        let b = SearchResult::new("1", "same", 0.5).with_source("b.pdf");

        assert_ne!(a.identity_key(), b.identity_key());
    }
}
