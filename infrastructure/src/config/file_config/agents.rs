//! Agent line-up configuration from TOML (`[agents]` section)

use super::super::issue::{ConfigIssue, ConfigIssueCode, Severity};
use arena_domain::{AgentSlot, Model, Persona};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agents]
/// personas = ["analytical", "lateral", "adversarial"]
/// models = ["gpt-4o-mini", "gpt-4.1-mini"]   # assigned to slots in turn
/// timeout_secs = 120
/// max_turns = 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// One slot per persona, in order
    pub personas: Vec<String>,
    /// Slot models, cycled over the personas; empty uses the default agent model
    pub models: Vec<String>,
    /// Per-agent deadline
    pub timeout_secs: u64,
    pub max_turns: u32,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            personas: Persona::default_lineup()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            models: Vec::new(),
            timeout_secs: 120,
            max_turns: 8,
        }
    }
}

impl FileAgentsConfig {
    /// Parse the persona list, skipping unknown names with a warning.
    ///
    /// Falls back to the default line-up when nothing valid remains.
    pub fn parse_personas(&self) -> (Vec<Persona>, Vec<ConfigIssue>) {
        let mut personas = Vec::new();
        let mut issues = Vec::new();

        for name in &self.personas {
            match name.parse::<Persona>() {
                Ok(persona) => personas.push(persona),
                Err(_) => issues.push(ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "agents.personas".to_string(),
                        value: name.clone(),
                        valid_values: vec![
                            "analytical".to_string(),
                            "lateral".to_string(),
                            "adversarial".to_string(),
                            "pragmatic".to_string(),
                        ],
                    },
                    message: format!("agents.personas: unknown persona '{}', skipped", name),
                }),
            }
        }

        if personas.is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::EmptyValue {
                    field: "agents.personas".to_string(),
                },
                message: "agents.personas: no valid personas, using the default line-up"
                    .to_string(),
            });
            personas = Persona::default_lineup();
        }

        (personas, issues)
    }

    /// Parse the slot models, rejecting empty names
    pub fn parse_models(&self) -> (Vec<Model>, Vec<ConfigIssue>) {
        let mut models = Vec::new();
        let mut issues = Vec::new();
        for name in &self.models {
            if name.trim().is_empty() {
                issues.push(ConfigIssue::empty("agents.models"));
            } else {
                models.push(Model::from(name.trim()));
            }
        }
        (models, issues)
    }

    /// Validate numeric limits
    pub fn validate_limits(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::out_of_range(
                "agents.timeout_secs",
                self.timeout_secs,
                "[1, ∞)",
            ));
        }
        if self.max_turns == 0 {
            issues.push(ConfigIssue::out_of_range(
                "agents.max_turns",
                self.max_turns,
                "[1, ∞)",
            ));
        }
        issues
    }

    /// Build the agent slots, `agent-1..N`, one per persona
    pub fn to_slots(&self) -> Vec<AgentSlot> {
        let (personas, _) = self.parse_personas();
        let (models, _) = self.parse_models();

        personas
            .iter()
            .enumerate()
            .map(|(i, persona)| {
                let model = if models.is_empty() {
                    Model::default_agent()
                } else {
                    models[i % models.len()].clone()
                };
                AgentSlot::new(format!("agent-{}", i + 1), *persona, model)
            })
            .collect()
    }
}
