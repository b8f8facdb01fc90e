//! Evidence grading and query repair services

mod evidence_grader;
mod query_rewriter;

pub use evidence_grader::EvidenceGrader;
pub use query_rewriter::QueryRewriter;
