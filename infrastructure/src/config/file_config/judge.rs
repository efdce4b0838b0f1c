//! Judge configuration from TOML (`[judge]` section)

use super::super::issue::ConfigIssue;
use arena_domain::scoring::{DEFAULT_PENALTY_FACTOR, DEFAULT_SIMILARITY_THRESHOLD};
use arena_domain::{DiversityPolicy, Model, WeightVector};
use serde::{Deserialize, Serialize};

/// Raw judge configuration from TOML
///
/// # Example
///
/// ```toml
/// [judge]
/// model = "gpt-4.1"
/// diversity_threshold = 0.72
/// penalty_factor = 0.8
/// panel_count = 3
/// weights = "0.4,0.3,0.15,0.15"   # accuracy,completeness,clarity,insight
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJudgeConfig {
    pub model: Option<String>,
    /// Similarity at or above which the diversity penalty applies
    pub diversity_threshold: f64,
    /// Multiplier applied to a penalized total
    pub penalty_factor: f64,
    /// Independent panels in consensus mode
    pub panel_count: usize,
    /// Overrides every category's default weights
    pub weights: Option<String>,
}

impl Default for FileJudgeConfig {
    fn default() -> Self {
        Self {
            model: None,
            diversity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            penalty_factor: DEFAULT_PENALTY_FACTOR,
            panel_count: 3,
            weights: None,
        }
    }
}

impl FileJudgeConfig {
    pub fn parse_model(&self) -> (Model, Vec<ConfigIssue>) {
        match self.model.as_deref().map(str::trim) {
            None => (Model::default_judge(), vec![]),
            Some("") => (Model::default_judge(), vec![ConfigIssue::empty("judge.model")]),
            Some(name) => (Model::from(name), vec![]),
        }
    }

    pub fn parse_weights(&self) -> (Option<WeightVector>, Vec<ConfigIssue>) {
        let Some(text) = &self.weights else {
            return (None, vec![]);
        };
        match text.parse::<WeightVector>() {
            Ok(weights) => (Some(weights), vec![]),
            Err(e) => (None, vec![ConfigIssue::invalid_value("judge.weights", text, e)]),
        }
    }

    pub fn diversity(&self) -> DiversityPolicy {
        DiversityPolicy {
            threshold: self.diversity_threshold,
            factor: self.penalty_factor,
        }
    }

    pub fn validate_ranges(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(0.0..=1.0).contains(&self.diversity_threshold) {
            issues.push(ConfigIssue::out_of_range(
                "judge.diversity_threshold",
                self.diversity_threshold,
                "[0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.penalty_factor) {
            issues.push(ConfigIssue::out_of_range(
                "judge.penalty_factor",
                self.penalty_factor,
                "[0, 1]",
            ));
        }
        if self.panel_count == 0 {
            issues.push(ConfigIssue::out_of_range(
                "judge.panel_count",
                self.panel_count,
                "[1, ∞)",
            ));
        }
        issues
    }
}
