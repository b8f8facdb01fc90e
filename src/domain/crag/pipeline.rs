//! Grading outcome and decision policy

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::DocumentGrade;
use super::scorer::GradedDocument;
use crate::domain::knowledge_base::SearchResult;

/// What the controller should do with a set of graded documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CragDecision {
    /// Enough documents are relevant
    UseRetrieved,
    /// Relevant only when ambiguous documents are counted
    SupplementNeeded,
    /// Some signal, but not enough to answer
    InsufficientEvidence,
    /// Nothing usable; retry with a better query
    RewriteNeeded,
}

impl CragDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UseRetrieved => "USE_RETRIEVED",
            Self::SupplementNeeded => "SUPPLEMENT_NEEDED",
            Self::InsufficientEvidence => "INSUFFICIENT_EVIDENCE",
            Self::RewriteNeeded => "REWRITE_NEEDED",
        }
    }
}

impl std::fmt::Display for CragDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counts behind one grading pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CragMetrics {
    pub total_documents: usize,
    pub correct_count: usize,
    pub ambiguous_count: usize,
    pub incorrect_count: usize,
    pub correct_ratio: f64,
    pub elapsed_ms: u64,
}

impl CragMetrics {
    fn from_grades(graded: &[GradedDocument], elapsed_ms: u64) -> Self {
        let count = |grade: DocumentGrade| graded.iter().filter(|g| g.grade == grade).count();
        let total = graded.len();
        let correct = count(DocumentGrade::Correct);

        Self {
            total_documents: total,
            correct_count: correct,
            ambiguous_count: count(DocumentGrade::Ambiguous),
            incorrect_count: count(DocumentGrade::Incorrect),
            correct_ratio: if total == 0 {
                0.0
            } else {
                correct as f64 / total as f64
            },
            elapsed_ms,
        }
    }

    pub fn usable_ratio(&self) -> f64 {
        if self.total_documents == 0 {
            0.0
        } else {
            (self.correct_count + self.ambiguous_count) as f64 / self.total_documents as f64
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("totalDocuments".to_string(), Value::from(self.total_documents));
        map.insert("correctCount".to_string(), Value::from(self.correct_count));
        map.insert("ambiguousCount".to_string(), Value::from(self.ambiguous_count));
        map.insert("incorrectCount".to_string(), Value::from(self.incorrect_count));
        map.insert("correctRatio".to_string(), Value::from(self.correct_ratio));
        map.insert("elapsed".to_string(), Value::from(self.elapsed_ms));
        map
    }
}

/// Outcome of one grading pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CragResult {
    pub decision: CragDecision,
    /// Usable documents only: INCORRECT removed, highest relevance first
    pub graded_documents: Vec<GradedDocument>,
    pub reason: String,
    pub overall_confidence: f64,
    pub metrics: CragMetrics,
}

impl CragResult {
    /// Every document accepted as CORRECT without grading
    pub fn passthrough(documents: Vec<SearchResult>) -> Self {
        let graded: Vec<GradedDocument> = documents
            .into_iter()
            .map(|d| GradedDocument::new(d, DocumentGrade::Correct, 1.0, "Grading disabled"))
            .collect();
        let metrics = CragMetrics::from_grades(&graded, 0);

        Self {
            decision: CragDecision::UseRetrieved,
            graded_documents: graded,
            reason: "Grading disabled".to_string(),
            overall_confidence: 1.0,
            metrics,
        }
    }

    /// Nothing was retrieved, so nothing was graded
    pub fn no_documents() -> Self {
        Self {
            decision: CragDecision::RewriteNeeded,
            graded_documents: Vec::new(),
            reason: "No documents retrieved".to_string(),
            overall_confidence: 0.0,
            metrics: CragMetrics::default(),
        }
    }

    /// Apply the decision policy to a complete grading pass.
    ///
    /// Rules are evaluated in order: correct ratio, usable ratio, no signal at
    /// all, partial signal.
    pub fn from_grades(
        graded: Vec<GradedDocument>,
        min_correct_threshold: f64,
        elapsed_ms: u64,
    ) -> Self {
        if graded.is_empty() {
            return Self::no_documents();
        }

        let metrics = CragMetrics::from_grades(&graded, elapsed_ms);
        let total = metrics.total_documents;
        let correct = metrics.correct_count;
        let ambiguous = metrics.ambiguous_count;
        let usable_ratio = metrics.usable_ratio();

        let (decision, reason, confidence) = if metrics.correct_ratio >= min_correct_threshold {
            (
                CragDecision::UseRetrieved,
                format!("{correct}/{total} documents are relevant"),
                metrics.correct_ratio,
            )
        } else if usable_ratio >= min_correct_threshold {
            (
                CragDecision::SupplementNeeded,
                format!("Only {correct} correct, {ambiguous} ambiguous - may need more context"),
                usable_ratio * 0.8,
            )
        } else if correct == 0 && ambiguous == 0 {
            (
                CragDecision::RewriteNeeded,
                "No relevant documents found - query rewrite recommended".to_string(),
                0.1,
            )
        } else {
            (
                CragDecision::InsufficientEvidence,
                format!("Only {}/{total} documents potentially relevant", correct + ambiguous),
                usable_ratio * 0.5,
            )
        };

        let mut usable: Vec<GradedDocument> =
            graded.into_iter().filter(|g| g.grade.is_usable()).collect();
        usable.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        Self {
            decision,
            graded_documents: usable,
            reason,
            overall_confidence: confidence,
            metrics,
        }
    }

    pub fn correct_documents(&self) -> Vec<SearchResult> {
        self.graded_documents
            .iter()
            .filter(|g| g.grade == DocumentGrade::Correct)
            .map(|g| g.document.clone())
            .collect()
    }

    pub fn usable_documents(&self) -> Vec<SearchResult> {
        self.graded_documents
            .iter()
            .map(|g| g.document.clone())
            .collect()
    }

    pub fn needs_rewrite(&self) -> bool {
        self.decision == CragDecision::RewriteNeeded
    }

    pub fn has_sufficient_evidence(&self) -> bool {
        matches!(
            self.decision,
            CragDecision::UseRetrieved | CragDecision::SupplementNeeded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(id: &str, grade: DocumentGrade, score: f64) -> GradedDocument {
        GradedDocument::new(SearchResult::new(id, id, 0.5), grade, score, "test")
    }

    fn grades(labels: &[DocumentGrade]) -> Vec<GradedDocument> {
        labels.iter()
            .enumerate()
            .map(|(i, g)| graded(&format!("d{i}"), *g, g.model_score()))
            .collect()
    }

    use DocumentGrade::{Ambiguous as A, Correct as C, Incorrect as I};

    #[test]
    fn test_use_retrieved_drops_incorrect() {
        let result = CragResult::from_grades(grades(&[C, C, C, A, I]), 0.5, 7);

        assert_eq!(result.decision, CragDecision::UseRetrieved);
        assert!((result.overall_confidence - 0.6).abs() < 1e-9);
        assert_eq!(result.graded_documents.len(), 4);
        assert!(result.graded_documents.iter().all(|g| g.grade != I));
        assert_eq!(result.correct_documents().len(), 3);
        assert_eq!(result.usable_documents().len(), 4);
        assert!(result.has_sufficient_evidence());
        assert_eq!(result.metrics.incorrect_count, 1);
        assert_eq!(result.metrics.elapsed_ms, 7);
    }

    #[test]
    fn test_supplement_needed_discounts_confidence() {
        let result = CragResult::from_grades(grades(&[C, A, A, I]), 0.5, 0);

        assert_eq!(result.decision, CragDecision::SupplementNeeded);
        assert!((result.overall_confidence - 0.75 * 0.8).abs() < 1e-9);
        assert!(result.has_sufficient_evidence());
    }

    #[test]
    fn test_rewrite_needed_when_everything_incorrect() {
        let result = CragResult::from_grades(grades(&[I, I, I]), 0.5, 0);

        assert_eq!(result.decision, CragDecision::RewriteNeeded);
        assert_eq!(result.overall_confidence, 0.1);
        assert!(result.graded_documents.is_empty());
        assert!(result.needs_rewrite());
    }

    #[test]
    fn test_insufficient_evidence_on_partial_signal() {
        let result = CragResult::from_grades(grades(&[A, I, I, I]), 0.5, 0);

        assert_eq!(result.decision, CragDecision::InsufficientEvidence);
        assert!((result.overall_confidence - 0.125).abs() < 1e-9);
        assert!(!result.has_sufficient_evidence());
        assert!(!result.needs_rewrite());
    }

    #[test]
    fn test_usable_documents_sorted_by_relevance() {
        let docs = vec![
            graded("low", A, 0.4),
            graded("high", C, 0.95),
            graded("mid", C, 0.7),
        ];
        let result = CragResult::from_grades(docs, 0.5, 0);

        let ids: Vec<&str> = result
            .graded_documents
            .iter()
            .map(|g| g.document.id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_no_documents() {
        let result = CragResult::from_grades(Vec::new(), 0.5, 0);

        assert_eq!(result.decision, CragDecision::RewriteNeeded);
        assert_eq!(result.overall_confidence, 0.0);
        assert_eq!(result.metrics.total_documents, 0);
    }

    #[test]
    fn test_passthrough() {
        let docs = vec![SearchResult::new("a", "x", 0.1), SearchResult::new("b", "y", 0.2)];
        let result = CragResult::passthrough(docs);

        assert_eq!(result.decision, CragDecision::UseRetrieved);
        assert_eq!(result.overall_confidence, 1.0);
        assert!(result.graded_documents.iter().all(|g| g.grade == C));
    }

    #[test]
    fn test_metrics_map() {
        let result = CragResult::from_grades(grades(&[C, I]), 0.5, 3);
        let map = result.metrics.to_map();

        assert_eq!(map["totalDocuments"], 2);
        assert_eq!(map["correctCount"], 1);
        assert_eq!(map["correctRatio"], 0.5);
    }
}
