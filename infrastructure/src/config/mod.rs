//! Configuration file loading for agent-arena
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ARENA_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./arena.toml` or `./.arena.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agent-arena/config.toml`
//! 5. Default values

mod file_config;
mod issue;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentsConfig, FileConfig, FileGateConfig, FileJudgeConfig,
    FileLearningConfig, FileProviderConfig, FileStorageConfig,
};
pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use loader::ConfigLoader;
