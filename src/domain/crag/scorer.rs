//! Per-document grading: model reply grammar and keyword fallback

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::DocumentGrade;
use crate::domain::knowledge_base::SearchResult;

static GRADE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(CORRECT|AMBIGUOUS|INCORRECT)\b").unwrap());

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "what",
    "where", "when", "who", "how", "why", "this", "that", "these", "those", "it", "its", "they",
    "them", "their",
];

/// A document with its relevance grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedDocument {
    pub document: SearchResult,
    pub grade: DocumentGrade,
    /// Relevance score (0.0 - 1.0)
    pub relevance_score: f64,
    pub reason: String,
}

impl GradedDocument {
    pub fn new(
        document: SearchResult,
        grade: DocumentGrade,
        relevance_score: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            document,
            grade,
            relevance_score: relevance_score.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }

    /// Grade parsed from a model reply; only the label is kept as the reason
    pub fn from_model(document: SearchResult, grade: DocumentGrade) -> Self {
        Self::new(
            document,
            grade,
            grade.model_score(),
            format!("LLM grading: {}", grade),
        )
    }
}

/// Extract the first whole-word grade label from a model reply
pub fn parse_grade_label(reply: &str) -> Option<DocumentGrade> {
    let label = GRADE_LABEL.find(reply)?.as_str().to_ascii_uppercase();

    match label.as_str() {
        "CORRECT" => Some(DocumentGrade::Correct),
        "AMBIGUOUS" => Some(DocumentGrade::Ambiguous),
        _ => Some(DocumentGrade::Incorrect),
    }
}

/// Cut content to `max_chars` characters, marking the cut with "..."
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}

/// User prompt sent to the grader for one document
pub fn grading_prompt(query: &str, content: &str, max_chars: usize) -> String {
    format!(
        "USER QUERY: {}\n\nDOCUMENT:\n{}",
        query,
        truncate_content(content, max_chars)
    )
}

/// Lower-cased alphanumeric keywords of at least three characters, stop words removed
pub fn extract_keywords(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|word| word.len() >= 3 && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Grade a document by the share of query keywords it contains
pub fn grade_by_keywords(query: &str, document: SearchResult) -> GradedDocument {
    let query_keywords = extract_keywords(query);
    let content_keywords = extract_keywords(&document.content);

    let overlap = if query_keywords.is_empty() {
        0.0
    } else {
        let matches = query_keywords.intersection(&content_keywords).count();
        matches as f64 / query_keywords.len() as f64
    };
    let percent = overlap * 100.0;

    let (grade, reason) = if overlap >= 0.6 {
        (DocumentGrade::Correct, format!("{percent:.0}% keyword overlap"))
    } else if overlap >= 0.3 {
        (
            DocumentGrade::Ambiguous,
            format!("{percent:.0}% keyword overlap (partial)"),
        )
    } else {
        (
            DocumentGrade::Incorrect,
            format!("Only {percent:.0}% keyword overlap"),
        )
    };

    GradedDocument::new(document, grade, overlap, format!("Heuristic: {reason}"))
}
