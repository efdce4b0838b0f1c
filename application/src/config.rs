//! Application-level configuration.
//!
//! [`ArenaConfig`] is the runtime view of everything a race needs: agent
//! line-up and limits, judge policy, gate thresholds and learning switches.
//! The infrastructure config loader builds it from files and environment.

use arena_domain::{AgentSlot, ConfidenceGate, DiversityPolicy, Model, Persona, WeightVector};
use arena_domain::learning::DEFAULT_QUALITY_THRESHOLD;
use std::time::Duration;

/// Agent line-up and per-agent limits
#[derive(Debug, Clone)]
pub struct AgentLimits {
    pub slots: Vec<AgentSlot>,
    /// Deadline for each agent execution
    pub timeout: Duration,
    pub max_turns: u32,
}

impl Default for AgentLimits {
    fn default() -> Self {
        Self {
            slots: AgentSlot::lineup(&Persona::default_lineup(), &Model::default_agent()),
            timeout: Duration::from_secs(120),
            max_turns: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JudgeSettings {
    pub model: Model,
    pub diversity: DiversityPolicy,
    /// Panels per consensus verdict
    pub panel_count: usize,
    /// Replaces the category's default weights when set
    pub weights: Option<WeightVector>,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            model: Model::default_judge(),
            diversity: DiversityPolicy::default(),
            panel_count: 3,
            weights: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LearningSettings {
    pub enabled: bool,
    /// Minimum winner total (out of 40) worth learning from
    pub quality_threshold: u8,
    /// Minimum success rate for a pattern to reach future prompts
    pub min_pattern_success: f64,
    /// Patterns injected into one prompt
    pub max_patterns: usize,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            min_pattern_success: 0.7,
            max_patterns: 3,
        }
    }
}

/// Runtime configuration of a race
#[derive(Debug, Clone, Default)]
pub struct ArenaConfig {
    pub agents: AgentLimits,
    pub judge: JudgeSettings,
    pub gate: ConfidenceGate,
    pub learning: LearningSettings,
}

impl ArenaConfig {
    /// Reject settings a race cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.agents.slots.is_empty() {
            return Err("no agent slots configured".to_string());
        }
        if self.agents.timeout.is_zero() {
            return Err("agent timeout must be positive".to_string());
        }
        if self.judge.panel_count == 0 {
            return Err("judge panel count must be at least 1".to_string());
        }
        let d = &self.judge.diversity;
        if !(0.0..=1.0).contains(&d.threshold) {
            return Err(format!("diversity threshold {} outside [0,1]", d.threshold));
        }
        if !(0.0..=1.0).contains(&d.factor) {
            return Err(format!("penalty factor {} outside [0,1]", d.factor));
        }
        let g = &self.gate.thresholds;
        if g.min_total > 40 {
            return Err(format!("gate min_total {} exceeds 40", g.min_total));
        }
        if !(0.0..=10.0).contains(&g.min_accuracy) {
            return Err(format!("gate min_accuracy {} outside [0,10]", g.min_accuracy));
        }
        if self.learning.quality_threshold > 40 {
            return Err(format!(
                "learning quality threshold {} exceeds 40",
                self.learning.quality_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.agents.slots.len(), 3);
        assert_eq!(config.judge.panel_count, 3);
        assert_eq!(config.learning.quality_threshold, 25);
        assert!(config.gate.enabled);
    }

    #[test]
    fn test_rejects_empty_lineup_and_zero_panels() {
        let mut config = ArenaConfig::default();
        config.agents.slots.clear();
        assert_eq!(config.validate().unwrap_err(), "no agent slots configured");

        let mut config = ArenaConfig::default();
        config.judge.panel_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_thresholds() {
        let mut config = ArenaConfig::default();
        config.judge.diversity.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.gate.thresholds.min_accuracy = 11.0;
        assert!(config.validate().is_err());
    }
}
