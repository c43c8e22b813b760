// Configuration layer for creating chat clients from settings

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// HTTP request timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_ms: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client, or `None` when no credential is configured
    pub fn create_chat_client(
        config: Option<OpenAIConfig>,
    ) -> Result<Option<Arc<dyn crate::traits::ChatClient>>> {
        match config {
            Some(config) if !config.api_key.trim().is_empty() => {
                let client = crate::openai::OpenAIClient::from_config(config)?;
                Ok(Some(Arc::new(client)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_disables_client() {
        assert!(ClientFactory::create_chat_client(None).unwrap().is_none());
        assert!(ClientFactory::create_chat_client(Some(OpenAIConfig::new("  ")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_configured_credential_creates_client() {
        let client = ClientFactory::create_chat_client(Some(OpenAIConfig::new("sk-test"))).unwrap();
        assert!(client.is_some());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = OpenAIConfig::new("test-key")
            .with_base_url("http://localhost:8080/v1")
            .with_timeout_ms(5_000);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: OpenAIConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(deserialized.timeout_ms, Some(5_000));
    }
}
