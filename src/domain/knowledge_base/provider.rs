//! Evidence search trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::SearchResult;
use crate::domain::error::DomainError;

/// Search parameters for evidence queries
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Query text to search for
    pub query: String,
    /// Maximum number of results to return
    pub top_k: u32,
    /// Minimum similarity threshold (0.0 - 1.0)
    pub similarity_threshold: f32,
    /// Opaque scope restriction (tenant, department, ...), passed through unmodified
    pub scope: Option<String>,
}

impl SearchParams {
    /// Create new search parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 10,
            similarity_threshold: 0.7,
            scope: None,
        }
    }

    /// Set number of results
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the scope filter
    pub fn with_scope(mut self, scope: Option<&str>) -> Self {
        self.scope = scope.map(str::to_string);
        self
    }
}

/// Vector similarity search over the private corpus.
///
/// Results are best matches first, at most `top_k`, each scoring at least
/// `similarity_threshold`. Any timeout or retry policy lives in the
/// implementation.
#[async_trait]
pub trait EvidenceSearch: Send + Sync + Debug {
    /// Search the corpus
    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError>;

    /// Get the backend type name
    fn provider_type(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock evidence search for testing
    #[derive(Debug, Default)]
    pub struct MockEvidenceSearch {
        fixed_results: Option<Vec<SearchResult>>,
        results_by_query: HashMap<String, Vec<SearchResult>>,
        should_fail: bool,
        search_count: AtomicUsize,
        seen_params: Mutex<Vec<SearchParams>>,
    }

    impl MockEvidenceSearch {
        /// Create a mock returning nothing
        pub fn new() -> Self {
            Self::default()
        }

        /// Return these results for every query
        pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
            self.fixed_results = Some(results);
            self
        }

        /// Return these results for one exact query text (takes precedence)
        pub fn with_results_for(mut self, query: impl Into<String>, results: Vec<SearchResult>) -> Self {
            self.results_by_query.insert(query.into(), results);
            self
        }

        /// Fail every search
        pub fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        /// Get the number of search calls
        pub fn search_count(&self) -> usize {
            self.search_count.load(Ordering::SeqCst)
        }

        /// Parameters of every call, in order
        pub fn seen_params(&self) -> Vec<SearchParams> {
            self.seen_params.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EvidenceSearch for MockEvidenceSearch {
        async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError> {
            self.search_count.fetch_add(1, Ordering::SeqCst);
            self.seen_params.lock().unwrap().push(params.clone());

            if self.should_fail {
                return Err(DomainError::search("Mock search configured to fail"));
            }

            let results = self
                .results_by_query
                .get(&params.query)
                .or(self.fixed_results.as_ref())
                .cloned()
                .unwrap_or_default();

            Ok(results.into_iter().take(params.top_k as usize).collect())
        }

        fn provider_type(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_respects_top_k_and_counts_calls() {
            let search = MockEvidenceSearch::new().with_search_results(vec![
                SearchResult::new("a", "one", 0.9),
                SearchResult::new("b", "two", 0.8),
                SearchResult::new("c", "three", 0.7),
            ]);

            let results = search
                .search(SearchParams::new("q").with_top_k(2).with_scope(Some("finance")))
                .await
                .unwrap();

            assert_eq!(results.len(), 2);
            assert_eq!(search.search_count(), 1);
            assert_eq!(search.seen_params()[0].scope.as_deref(), Some("finance"));
        }

        #[tokio::test]
        async fn test_mock_failure() {
            let search = MockEvidenceSearch::failing();
            assert!(search.search(SearchParams::new("q")).await.is_err());
            assert_eq!(search.search_count(), 1);
        }
    }
}
