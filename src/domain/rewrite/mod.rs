//! Query rewrite domain

mod config;

pub use config::{strip_wrapping_quotes, RewriteConfig, REWRITE_SYSTEM_PROMPT};
