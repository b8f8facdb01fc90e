//! CRAG (Corrective RAG) domain
//!
//! Grades retrieved documents against a query and turns the grade
//! distribution into a go/no-go decision for the controller.

mod config;
mod pipeline;
mod scorer;

pub use config::{CragConfig, DocumentGrade, GRADER_SYSTEM_PROMPT};
pub use pipeline::{CragDecision, CragMetrics, CragResult};
pub use scorer::{
    extract_keywords, grade_by_keywords, grading_prompt, parse_grade_label, truncate_content,
    GradedDocument,
};
