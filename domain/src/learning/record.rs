//! Learning records and their EMA update

use crate::core::category::TaskCategory;
use crate::gate::ConfidenceGateDecision;
use crate::scoring::TOTAL_MAX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum winner total (out of 40) worth learning from
pub const DEFAULT_QUALITY_THRESHOLD: u8 = 25;
/// Weight kept from the previous success rate on each update
pub const EMA_RETAIN: f64 = 0.8;

/// Identity of one transfer: who learns what from whom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LearningKey {
    pub target_agent: String,
    pub source_agent: String,
    pub category: TaskCategory,
    pub persona: String,
}

impl LearningKey {
    pub fn new(
        target_agent: impl Into<String>,
        source_agent: impl Into<String>,
        category: TaskCategory,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            target_agent: target_agent.into(),
            source_agent: source_agent.into(),
            category,
            persona: persona.into(),
        }
    }

    /// Same agents and category; personas match when either contains the other
    pub fn matches(&self, other: &LearningKey) -> bool {
        if self.target_agent != other.target_agent
            || self.source_agent != other.source_agent
            || self.category != other.category
        {
            return false;
        }
        let a = self.persona.to_lowercase();
        let b = other.persona.to_lowercase();
        a.contains(&b) || b.contains(&a)
    }
}

/// Accumulated outcome of one transfer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub key: LearningKey,
    pub pattern: String,
    pub applications: u32,
    pub successes: u32,
    /// Exponentially weighted quality in [0,1]
    pub success_rate: f64,
    pub avg_lift: f64,
    pub lift_samples: u32,
    pub updated_at: DateTime<Utc>,
}

impl LearningRecord {
    pub fn new(key: LearningKey, pattern: impl Into<String>) -> Self {
        Self {
            key,
            pattern: pattern.into(),
            applications: 0,
            successes: 0,
            success_rate: 0.0,
            avg_lift: 0.0,
            lift_samples: 0,
            updated_at: Utc::now(),
        }
    }

    /// Fold one observed winner into the record.
    ///
    /// `quality` is `total / 40`. The first sample seeds the rate; later
    /// samples update it as `0.8 · old + 0.2 · quality`. Lift is a running
    /// mean over every sample.
    pub fn apply(&mut self, pattern: &str, winner_total: u8, lift: f64, quality_threshold: u8) {
        let quality = f64::from(winner_total) / f64::from(TOTAL_MAX);
        let success_floor = f64::from(quality_threshold) / f64::from(TOTAL_MAX);

        self.success_rate = if self.applications == 0 {
            quality
        } else {
            EMA_RETAIN * self.success_rate + (1.0 - EMA_RETAIN) * quality
        };
        self.applications += 1;
        if quality >= success_floor {
            self.successes += 1;
        }

        self.lift_samples += 1;
        self.avg_lift += (lift - self.avg_lift) / f64::from(self.lift_samples);

        self.pattern = pattern.to_string();
        self.updated_at = Utc::now();
    }
}

/// Why learning must not run for this verdict, or `None` when it may
pub fn learning_skip_reason(
    gate: &ConfidenceGateDecision,
    winner_total: u8,
    quality_threshold: u8,
) -> Option<String> {
    if !gate.passed {
        return Some(format!("confidence gate failed: {}", gate.reason));
    }
    if winner_total < quality_threshold {
        return Some(format!(
            "winner total {} below quality threshold {}",
            winner_total, quality_threshold
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateThresholds;

    fn key(persona: &str) -> LearningKey {
        LearningKey::new("agent-2", "agent-1", TaskCategory::Math, persona)
    }

    fn gate(passed: bool) -> ConfidenceGateDecision {
        ConfidenceGateDecision {
            enabled: true,
            passed,
            winner_total: 30,
            winner_accuracy: 8.0,
            margin: if passed { 4 } else { 1 },
            thresholds: GateThresholds::default(),
            reason: if passed {
                "all confidence thresholds met".to_string()
            } else {
                "margin 1 < 2".to_string()
            },
        }
    }

    #[test]
    fn test_persona_substring_match() {
        assert!(key("analytical").matches(&key("Analytical-v2")));
        assert!(key("analytical-v2").matches(&key("analytical")));
        assert!(!key("analytical").matches(&key("lateral")));

        let other_category = LearningKey::new("agent-2", "agent-1", TaskCategory::Coding, "analytical");
        assert!(!key("analytical").matches(&other_category));
    }

    #[test]
    fn test_first_sample_seeds_rate() {
        let mut record = LearningRecord::new(key("analytical"), "");
        record.apply("p", 32, 12.0, DEFAULT_QUALITY_THRESHOLD);
        assert_eq!(record.applications, 1);
        assert_eq!(record.successes, 1);
        assert!((record.success_rate - 0.8).abs() < 1e-12);
        assert_eq!(record.avg_lift, 12.0);
        assert_eq!(record.pattern, "p");
    }

    #[test]
    fn test_ema_and_running_lift() {
        let mut record = LearningRecord::new(key("analytical"), "");
        record.apply("p", 32, 12.0, DEFAULT_QUALITY_THRESHOLD);
        record.apply("p", 20, 0.0, DEFAULT_QUALITY_THRESHOLD);
        // 0.8 * 0.8 + 0.2 * 0.5
        assert!((record.success_rate - 0.74).abs() < 1e-12);
        assert_eq!(record.applications, 2);
        assert_eq!(record.successes, 1);
        assert_eq!(record.lift_samples, 2);
        assert!((record.avg_lift - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_skip_reasons() {
        assert!(learning_skip_reason(&gate(true), 30, 25).is_none());
        assert_eq!(
            learning_skip_reason(&gate(true), 24, 25).unwrap(),
            "winner total 24 below quality threshold 25"
        );
        let failed = learning_skip_reason(&gate(false), 35, 25).unwrap();
        assert!(failed.contains("margin 1 < 2"));
    }
}
