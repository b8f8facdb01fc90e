//! Knowledge base domain - evidence search contract

mod entity;
mod provider;

pub use entity::SearchResult;
pub use provider::{EvidenceSearch, SearchParams};

#[cfg(test)]
pub use provider::mock::MockEvidenceSearch;
