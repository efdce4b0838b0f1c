//! OpenAI-compatible LLM session implementation
//!
//! The chat-completions API is stateless, so the session keeps the
//! conversation history locally and resends it on every call.

use super::types::{self, ChatMessage, ChatRequest, ChatResponse};
use arena_application::ports::llm_gateway::{GatewayError, LlmReply, LlmSession};
use arena_domain::Model;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared HTTP settings for every session of one gateway
pub(super) struct Endpoint {
    pub client: reqwest::Client,
    pub completions_url: String,
    pub api_key: String,
    pub max_tokens: u32,
}

pub struct OpenAiCompatSession {
    endpoint: Arc<Endpoint>,
    model: Model,
    messages: Mutex<Vec<ChatMessage>>,
}

impl OpenAiCompatSession {
    pub(super) fn new(endpoint: Arc<Endpoint>, model: Model, system_prompt: Option<&str>) -> Self {
        let messages = system_prompt
            .filter(|p| !p.is_empty())
            .map(|p| vec![ChatMessage::system(p)])
            .unwrap_or_default();
        Self {
            endpoint,
            model,
            messages: Mutex::new(messages),
        }
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<LlmReply, GatewayError> {
        let request = ChatRequest {
            model: self.model.as_str(),
            messages,
            max_tokens: self.endpoint.max_tokens,
        };

        debug!(
            model = %self.model,
            messages = messages.len(),
            "Calling chat completions"
        );

        let response = self
            .endpoint
            .client
            .post(&self.endpoint.completions_url)
            .bearer_auth(&self.endpoint.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| types::convert_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{} returned {}: {}",
                self.endpoint.completions_url,
                status,
                body.trim()
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            GatewayError::RequestFailed(format!("Failed to parse completion: {}", e))
        })?;
        types::convert_response(body)
    }
}

#[async_trait]
impl LlmSession for OpenAiCompatSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_with_usage(&self, content: &str) -> Result<LlmReply, GatewayError> {
        let mut messages = self.messages.lock().await;
        messages.push(ChatMessage::user(content));

        match self.complete(&messages).await {
            Ok(reply) => {
                messages.push(ChatMessage::assistant(reply.text.clone()));
                Ok(reply)
            }
            Err(e) => {
                // keep history consistent for a retry by the caller
                messages.pop();
                Err(e)
            }
        }
    }
}
