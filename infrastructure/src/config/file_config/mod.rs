//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::to_arena_config`] turns them
//! into the application's runtime [`ArenaConfig`].

mod agents;
mod gate;
mod judge;
mod learning;
mod provider;
mod storage;

pub use agents::FileAgentsConfig;
pub use gate::FileGateConfig;
pub use judge::FileJudgeConfig;
pub use learning::FileLearningConfig;
pub use provider::FileProviderConfig;
pub use storage::FileStorageConfig;

use super::issue::ConfigIssue;
use arena_application::{AgentLimits, ArenaConfig, JudgeSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration that cannot be turned into a runnable [`ArenaConfig`]
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration: {}", join_messages(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn join_messages(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent line-up and limits
    pub agents: FileAgentsConfig,
    /// Judge model, diversity penalty and panels
    pub judge: FileJudgeConfig,
    /// Confidence gate thresholds
    pub gate: FileGateConfig,
    /// Learning loop switches
    pub learning: FileLearningConfig,
    /// OpenAI-compatible endpoint
    pub provider: FileProviderConfig,
    /// Ledger and catalogue location
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. Errors make
    /// [`to_arena_config`](Self::to_arena_config) fail; warnings mean a
    /// fallback value is used.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.agents.parse_personas().1);
        issues.extend(self.agents.parse_models().1);
        issues.extend(self.agents.validate_limits());

        issues.extend(self.judge.parse_model().1);
        issues.extend(self.judge.parse_weights().1);
        issues.extend(self.judge.validate_ranges());

        issues.extend(self.gate.validate_ranges());
        issues.extend(self.learning.validate_ranges());
        issues.extend(self.provider.validate());

        issues
    }

    /// Build the runtime configuration, failing on any error-level issue
    pub fn to_arena_config(&self) -> Result<ArenaConfig, ConfigValidationError> {
        let errors: Vec<ConfigIssue> = self
            .validate()
            .into_iter()
            .filter(ConfigIssue::is_error)
            .collect();
        if !errors.is_empty() {
            return Err(ConfigValidationError::Invalid(errors));
        }

        Ok(ArenaConfig {
            agents: AgentLimits {
                slots: self.agents.to_slots(),
                timeout: Duration::from_secs(self.agents.timeout_secs),
                max_turns: self.agents.max_turns,
            },
            judge: JudgeSettings {
                model: self.judge.parse_model().0,
                diversity: self.judge.diversity(),
                panel_count: self.judge.panel_count,
                weights: self.judge.parse_weights().0,
            },
            gate: self.gate.to_gate(),
            learning: self.learning.to_settings(),
        })
    }
}
