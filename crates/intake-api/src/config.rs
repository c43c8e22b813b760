use config::{Config as ConfigLoader, ConfigError, Environment, File};
use intake_llm::OpenAIConfig;
use intake_types::{ContextPolicy, PipelineConfig};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub mongodb_uri: Option<String>,
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
    pub collection: String,
    pub connect_timeout_ms: u64,
    pub operation_timeout_ms: u64,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "project_brief".to_string(),
            collection: "agent_state".to_string(),
            connect_timeout_ms: 3_000,
            operation_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    /// Deadline for one extraction or reply call
    pub timeout_ms: u64,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.2,
            timeout_ms: 20_000,
            base_url: None,
        }
    }
}

impl From<LlmConfig> for intake_types::LLMConfig {
    fn from(config: LlmConfig) -> Self {
        intake_types::LLMConfig::new(config.model).with_temperature(config.temperature)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    pub max_questions: usize,
    /// User turns fed to extraction; 0 keeps the whole conversation
    pub context_window: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_questions: 2,
            context_window: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables prefixed `INTAKE_`, sections split by `__`
    ///    (e.g. `INTAKE_SERVER__PORT=9000`)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("INTAKE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Both secrets are optional: without them the service runs in memory
        // with fallback extraction
        cfg.mongodb_uri = secret("MONGODB_URI");
        cfg.openai_api_key = secret("OPENAI_API_KEY");

        Ok(cfg)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let context_policy = match self.intake.context_window {
            0 => ContextPolicy::AllMessages,
            k => ContextPolicy::LastK { k },
        };
        PipelineConfig::new()
            .with_max_questions(self.intake.max_questions)
            .with_context_policy(context_policy)
            .with_extraction_timeout(Duration::from_millis(self.llm.timeout_ms))
    }

    /// Provider settings, or `None` when no API key is configured
    pub fn openai_config(&self) -> Option<OpenAIConfig> {
        let key = self.openai_api_key.as_deref()?;
        let mut config = OpenAIConfig::new(key).with_timeout_ms(self.llm.timeout_ms);
        if let Some(base_url) = &self.llm.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Some(config)
    }
}

fn secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [mongodb]
            database = "intake_test"
            collection = "checkpoints"
            connect_timeout_ms = 500
            operation_timeout_ms = 1000

            [llm]
            model = "gpt-4.1-mini"
            temperature = 0.4
            timeout_ms = 8000

            [intake]
            max_questions = 1
            context_window = 0

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_ms, 60_000);
        assert_eq!(config.mongodb.collection, "checkpoints");

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.max_questions, 1);
        assert_eq!(pipeline.context_policy, ContextPolicy::AllMessages);
        assert_eq!(pipeline.extraction_timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_missing_sections_use_deployment_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mongodb.database, "project_brief");
        assert_eq!(config.mongodb.collection, "agent_state");
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(
            config.pipeline_config().context_policy,
            ContextPolicy::LastK { k: 15 }
        );
    }

    #[test]
    fn test_openai_config_requires_key() {
        let mut config = Config::default();
        assert!(config.openai_config().is_none());

        config.openai_api_key = Some("sk-test".to_string());
        config.llm.base_url = Some("http://localhost:4000/v1".to_string());
        let openai = config.openai_config().unwrap();
        assert_eq!(openai.base_url.as_deref(), Some("http://localhost:4000/v1"));
        assert_eq!(openai.timeout_ms, Some(20_000));
    }
}
