//! Confidence gate configuration from TOML (`[gate]` section)

use super::super::issue::ConfigIssue;
use arena_domain::scoring::TOTAL_MAX;
use arena_domain::{ConfidenceGate, GateThresholds};
use serde::{Deserialize, Serialize};

/// Raw gate configuration from TOML
///
/// ```toml
/// [gate]
/// enabled = true
/// min_total = 26
/// min_margin = 2
/// min_accuracy = 6.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGateConfig {
    pub enabled: bool,
    pub min_total: u8,
    pub min_margin: u8,
    pub min_accuracy: f64,
}

impl Default for FileGateConfig {
    fn default() -> Self {
        let thresholds = GateThresholds::default();
        Self {
            enabled: true,
            min_total: thresholds.min_total,
            min_margin: thresholds.min_margin,
            min_accuracy: thresholds.min_accuracy,
        }
    }
}

impl FileGateConfig {
    pub fn to_gate(&self) -> ConfidenceGate {
        ConfidenceGate {
            enabled: self.enabled,
            thresholds: GateThresholds {
                min_total: self.min_total,
                min_margin: self.min_margin,
                min_accuracy: self.min_accuracy,
            },
        }
    }

    pub fn validate_ranges(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.min_total > TOTAL_MAX {
            issues.push(ConfigIssue::out_of_range("gate.min_total", self.min_total, "[0, 40]"));
        }
        if self.min_margin > TOTAL_MAX {
            issues.push(ConfigIssue::out_of_range("gate.min_margin", self.min_margin, "[0, 40]"));
        }
        if !(0.0..=10.0).contains(&self.min_accuracy) {
            issues.push(ConfigIssue::out_of_range(
                "gate.min_accuracy",
                self.min_accuracy,
                "[0, 10]",
            ));
        }
        issues
    }
}
