//! Learning configuration from TOML (`[learning]` section)

use super::super::issue::ConfigIssue;
use arena_application::LearningSettings;
use arena_domain::scoring::TOTAL_MAX;
use serde::{Deserialize, Serialize};

/// Raw learning configuration from TOML
///
/// ```toml
/// [learning]
/// enabled = true
/// quality_threshold = 25      # minimum winner total out of 40
/// min_pattern_success = 0.7
/// max_patterns = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLearningConfig {
    pub enabled: bool,
    pub quality_threshold: u8,
    pub min_pattern_success: f64,
    pub max_patterns: usize,
}

impl Default for FileLearningConfig {
    fn default() -> Self {
        let settings = LearningSettings::default();
        Self {
            enabled: settings.enabled,
            quality_threshold: settings.quality_threshold,
            min_pattern_success: settings.min_pattern_success,
            max_patterns: settings.max_patterns,
        }
    }
}

impl FileLearningConfig {
    pub fn to_settings(&self) -> LearningSettings {
        LearningSettings {
            enabled: self.enabled,
            quality_threshold: self.quality_threshold,
            min_pattern_success: self.min_pattern_success,
            max_patterns: self.max_patterns,
        }
    }

    pub fn validate_ranges(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.quality_threshold > TOTAL_MAX {
            issues.push(ConfigIssue::out_of_range(
                "learning.quality_threshold",
                self.quality_threshold,
                "[0, 40]",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_pattern_success) {
            issues.push(ConfigIssue::out_of_range(
                "learning.min_pattern_success",
                self.min_pattern_success,
                "[0, 1]",
            ));
        }
        issues
    }
}
