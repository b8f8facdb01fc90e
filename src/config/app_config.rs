use serde::Deserialize;

use crate::domain::agentic::AgenticConfig;
use crate::domain::crag::CragConfig;
use crate::domain::hyde::HydeConfig;
use crate::domain::reflection::ReflectionConfig;
use crate::domain::rewrite::RewriteConfig;
use crate::domain::routing::RouterConfig;
use crate::infrastructure::llm::CompletionConfig;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub agentic: AgenticRagConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Per-stage settings of the retrieval pipeline
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgenticRagConfig {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub crag: CragConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub hyde: HydeConfig,
    #[serde(default)]
    pub reflection: ReflectionConfig,
    #[serde(default)]
    pub orchestrator: AgenticConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `APP__*` environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
