//! Infrastructure layer for agent-arena
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agent;
pub mod classifier;
pub mod config;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use agent::LlmAgentExecutor;
pub use classifier::KeywordClassifier;
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileProviderConfig,
    FileStorageConfig, Severity,
};
pub use providers::{OpenAiCompatConfig, OpenAiCompatGateway};
pub use storage::{FileLearningStore, FilePersistenceSink};
