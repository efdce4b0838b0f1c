//! OpenAI-compatible chat-completions gateway
//!
//! Works against any endpoint that speaks `POST {base_url}/chat/completions`
//! with bearer authentication: OpenAI itself, Azure-style proxies, vLLM,
//! Ollama and similar local servers.

mod session;
mod types;

pub use session::OpenAiCompatSession;

use crate::config::FileProviderConfig;
use arena_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use arena_domain::Model;
use async_trait::async_trait;
use session::Endpoint;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Resolved connection settings
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl OpenAiCompatConfig {
    /// Resolve settings from the `[provider]` section.
    ///
    /// Fails with [`GatewayError::Configuration`] when no API key is found.
    pub fn from_file_config(config: &FileProviderConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::Configuration(format!(
                "API key not found: set {} or provider.api_key",
                config.api_key_env
            ))
        })?;
        Ok(Self {
            base_url: config.base_url.clone(),
            api_key,
            max_tokens: config.max_tokens,
            request_timeout: config.request_timeout(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

pub struct OpenAiCompatGateway {
    endpoint: Arc<Endpoint>,
}

impl OpenAiCompatGateway {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {}", e)))?;

        let completions_url = config.completions_url();
        info!(url = %completions_url, "OpenAI-compatible gateway initialized");

        Ok(Self {
            endpoint: Arc::new(Endpoint {
                client,
                completions_url,
                api_key: config.api_key,
                max_tokens: config.max_tokens,
            }),
        })
    }

    pub fn from_file_config(config: &FileProviderConfig) -> Result<Self, GatewayError> {
        Self::new(OpenAiCompatConfig::from_file_config(config)?)
    }

    pub fn completions_url(&self) -> &str {
        &self.endpoint.completions_url
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiCompatSession::new(
            self.endpoint.clone(),
            model.clone(),
            None,
        )))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiCompatSession::new(
            self.endpoint.clone(),
            model.clone(),
            Some(system_prompt),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_key: Option<&str>) -> FileProviderConfig {
        FileProviderConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            api_key_env: "ARENA_TEST_UNSET_KEY_VAR".to_string(),
            api_key: api_key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let result = OpenAiCompatGateway::from_file_config(&provider(None));
        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let gateway = OpenAiCompatGateway::from_file_config(&provider(Some("sk-local"))).unwrap();
        assert_eq!(
            gateway.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_session_carries_model() {
        let gateway = OpenAiCompatGateway::from_file_config(&provider(Some("sk-local"))).unwrap();
        let session = gateway
            .create_session_with_system_prompt(&Model::Gpt4o, "judge")
            .await
            .unwrap();
        assert_eq!(session.model(), &Model::Gpt4o);
    }
}
