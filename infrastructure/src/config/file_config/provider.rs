//! Provider configuration from TOML (`[provider]` section)

use super::super::issue::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible endpoint settings.
///
/// ```toml
/// [provider]
/// base_url = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
/// max_tokens = 4096
/// request_timeout = 120   # seconds
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; use env var instead).
    pub api_key: Option<String>,
    /// Max tokens per response
    pub max_tokens: u32,
    /// HTTP request timeout in seconds
    pub request_timeout: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            max_tokens: 4096,
            request_timeout: 120,
        }
    }
}

impl FileProviderConfig {
    /// Explicit key first, then the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::empty("provider.base_url"));
        } else if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            issues.push(ConfigIssue::invalid_value(
                "provider.base_url",
                &self.base_url,
                "expected an http(s) URL",
            ));
        }
        if self.request_timeout == 0 {
            issues.push(ConfigIssue::out_of_range(
                "provider.request_timeout",
                self.request_timeout,
                "[1, ∞)",
            ));
        }
        issues
    }
}
