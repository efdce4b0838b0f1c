//! Confidence gate
//!
//! Decides whether a verdict is trustworthy enough to learn from. The gate
//! never changes the winner; it only annotates the verdict and guards the
//! learning loop.

use crate::scoring::{ConfidenceLevel, JudgeResult};
use serde::{Deserialize, Serialize};

/// Coverage the winner needs for a high confidence level
pub const HIGH_CONFIDENCE_COVERAGE: f64 = 0.75;
/// Highest disagreement index still compatible with high confidence
pub const HIGH_CONFIDENCE_MAX_DISAGREEMENT: f64 = 0.12;

/// Minimums a winner must reach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateThresholds {
    pub min_total: u8,
    pub min_margin: u8,
    pub min_accuracy: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_total: 26,
            min_margin: 2,
            min_accuracy: 6.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceGate {
    pub enabled: bool,
    pub thresholds: GateThresholds,
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            enabled: true,
            thresholds: GateThresholds::default(),
        }
    }
}

/// Outcome of gating one verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceGateDecision {
    pub enabled: bool,
    pub passed: bool,
    pub winner_total: u8,
    pub winner_accuracy: f64,
    /// Winner total minus runner-up total (the winner total when unopposed)
    pub margin: u8,
    pub thresholds: GateThresholds,
    pub reason: String,
}

impl ConfidenceGate {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_thresholds(thresholds: GateThresholds) -> Self {
        Self {
            enabled: true,
            thresholds,
        }
    }

    pub fn evaluate(&self, judge: &JudgeResult) -> ConfidenceGateDecision {
        let (winner_total, winner_accuracy) = judge
            .winner()
            .map(|w| (w.total, w.metrics.accuracy))
            .unwrap_or((0, 0.0));
        let margin = match judge.runner_up() {
            Some(runner_up) => winner_total.saturating_sub(runner_up.total),
            None => winner_total,
        };

        let mut decision = ConfidenceGateDecision {
            enabled: self.enabled,
            passed: true,
            winner_total,
            winner_accuracy,
            margin,
            thresholds: self.thresholds,
            reason: String::new(),
        };

        if !self.enabled {
            decision.reason = "confidence gate disabled".to_string();
            return decision;
        }

        let t = &self.thresholds;
        let mut violations = Vec::new();
        if winner_total < t.min_total {
            violations.push(format!("total {} < {}", winner_total, t.min_total));
        }
        if margin < t.min_margin {
            violations.push(format!("margin {} < {}", margin, t.min_margin));
        }
        if winner_accuracy < t.min_accuracy {
            violations.push(format!(
                "accuracy {:.2} < {:.2}",
                winner_accuracy, t.min_accuracy
            ));
        }

        if violations.is_empty() {
            decision.reason = "all confidence thresholds met".to_string();
        } else {
            decision.passed = false;
            decision.reason = violations.join("; ");
        }
        decision
    }
}

/// Confidence level of a gated verdict
pub fn derive_confidence_level(
    decision: &ConfidenceGateDecision,
    judge: &JudgeResult,
) -> ConfidenceLevel {
    if !decision.passed {
        ConfidenceLevel::Low
    } else if judge.evidence_coverage >= HIGH_CONFIDENCE_COVERAGE
        && judge.disagreement_index <= HIGH_CONFIDENCE_MAX_DISAGREEMENT
    {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Medium
    }
}
