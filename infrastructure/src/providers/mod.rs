//! LLM provider adapters implementing the [`LlmGateway`](arena_application::LlmGateway) port

pub mod openai_compat;

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatGateway, OpenAiCompatSession};
