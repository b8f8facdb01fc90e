//! Hypothesis-driven retrieval domain

mod config;
mod fusion;

pub use config::{is_suitable_query, HydeConfig, HYDE_SYSTEM_PROMPT};
pub use fusion::{fuse_results, HydeResult};
