//! Application configuration

mod app_config;

pub use app_config::{AgenticRagConfig, AppConfig, LogFormat, LoggingConfig};
