//! Per-agent judge scores, evidence and totals

use super::weights::WeightVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a single metric
pub const METRIC_MAX: f64 = 10.0;
/// Upper bound of a weighted total
pub const TOTAL_MAX: u8 = 40;
/// Metric value used by fallback and by-default scoring
pub const NEUTRAL_METRIC: f64 = 5.0;
/// Marker carried by evidence that was never supplied by a judge
pub const PLACEHOLDER_EVIDENCE: &str = "[no evidence]";
/// Reasoning attached to fallback scores
pub const FALLBACK_REASONING: &str = "fallback: judge output could not be parsed";

/// The four judging metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Accuracy,
    Completeness,
    Clarity,
    Insight,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Accuracy,
        Metric::Completeness,
        Metric::Clarity,
        Metric::Insight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Completeness => "completeness",
            Metric::Clarity => "clarity",
            Metric::Insight => "insight",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metric values, each clamped to [0,10]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub accuracy: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub insight: f64,
}

impl MetricScores {
    pub fn new(accuracy: f64, completeness: f64, clarity: f64, insight: f64) -> Self {
        Self {
            accuracy: clamp_metric(accuracy),
            completeness: clamp_metric(completeness),
            clarity: clamp_metric(clarity),
            insight: clamp_metric(insight),
        }
    }

    /// Every metric set to the same value
    pub fn flat(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Completeness => self.completeness,
            Metric::Clarity => self.clarity,
            Metric::Insight => self.insight,
        }
    }
}

fn clamp_metric(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, METRIC_MAX)
    } else {
        0.0
    }
}

/// Character span of a quote inside an agent's response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSpan {
    /// Inclusive start, in chars
    pub start: usize,
    /// Exclusive end, in chars
    pub end: usize,
}

/// Quote + rationale backing one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub quote: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<EvidenceSpan>,
}

impl Evidence {
    pub fn new(quote: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            rationale: rationale.into(),
            location: None,
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_EVIDENCE, PLACEHOLDER_EVIDENCE)
    }

    pub fn with_location(mut self, location: Option<EvidenceSpan>) -> Self {
        self.location = location;
        self
    }

    /// Whether a judge actually supplied a quote and a rationale
    pub fn is_substantive(&self) -> bool {
        let quote = self.quote.trim();
        let rationale = self.rationale.trim();
        !quote.is_empty()
            && !rationale.is_empty()
            && quote != PLACEHOLDER_EVIDENCE
            && rationale != PLACEHOLDER_EVIDENCE
            && rationale != FALLBACK_REASONING
    }
}

/// One evidence entry per metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEvidence {
    pub accuracy: Evidence,
    pub completeness: Evidence,
    pub clarity: Evidence,
    pub insight: Evidence,
}

impl MetricEvidence {
    pub fn placeholder() -> Self {
        Self {
            accuracy: Evidence::placeholder(),
            completeness: Evidence::placeholder(),
            clarity: Evidence::placeholder(),
            insight: Evidence::placeholder(),
        }
    }

    pub fn get(&self, metric: Metric) -> &Evidence {
        match metric {
            Metric::Accuracy => &self.accuracy,
            Metric::Completeness => &self.completeness,
            Metric::Clarity => &self.clarity,
            Metric::Insight => &self.insight,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut Evidence {
        match metric {
            Metric::Accuracy => &mut self.accuracy,
            Metric::Completeness => &mut self.completeness,
            Metric::Clarity => &mut self.clarity,
            Metric::Insight => &mut self.insight,
        }
    }

    /// Fraction of the four metrics backed by substantive evidence
    pub fn coverage(&self) -> f64 {
        let covered = Metric::ALL
            .iter()
            .filter(|m| self.get(**m).is_substantive())
            .count();
        covered as f64 / Metric::ALL.len() as f64
    }
}

/// Audit record of a domain-specific objective correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveAdjustment {
    pub scheme: String,
    /// Deterministic 0–10 score derived from telemetry
    pub objective_score: f64,
    pub accuracy_delta: f64,
    pub completeness_delta: f64,
    pub notes: Vec<String>,
}

/// Convert weighted metrics to a 0–40 integer total
pub fn weighted_total(metrics: &MetricScores, weights: &WeightVector) -> u8 {
    let raw = (weights.weighted(metrics) * 4.0).round();
    raw.clamp(0.0, f64::from(TOTAL_MAX)) as u8
}

/// Apply a multiplicative penalty to a total, rounding once
pub fn penalized_total(base_total: u8, factor: f64) -> u8 {
    let raw = (f64::from(base_total) * factor).round();
    raw.clamp(0.0, f64::from(TOTAL_MAX)) as u8
}

/// A judge's verdict on one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeScore {
    pub agent_id: String,
    pub metrics: MetricScores,
    /// Weighted total before the diversity penalty
    pub base_total: u8,
    /// Final total in [0,40]
    pub total: u8,
    pub reasoning: String,
    pub evidence: MetricEvidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_adjustment: Option<ObjectiveAdjustment>,
    /// Highest similarity against any other agent (0 when alone)
    #[serde(default)]
    pub max_similarity: f64,
    #[serde(default)]
    pub penalized: bool,
    #[serde(default)]
    pub fallback: bool,
}

impl JudgeScore {
    pub fn new(
        agent_id: impl Into<String>,
        metrics: MetricScores,
        reasoning: impl Into<String>,
        evidence: MetricEvidence,
        weights: &WeightVector,
    ) -> Self {
        let base_total = weighted_total(&metrics, weights);
        Self {
            agent_id: agent_id.into(),
            metrics,
            base_total,
            total: base_total,
            reasoning: reasoning.into(),
            evidence,
            objective_adjustment: None,
            max_similarity: 0.0,
            penalized: false,
            fallback: false,
        }
    }

    /// Flat neutral score used when a judge pass could not be parsed
    pub fn fallback(agent_id: impl Into<String>, weights: &WeightVector) -> Self {
        let mut score = Self::new(
            agent_id,
            MetricScores::flat(NEUTRAL_METRIC),
            FALLBACK_REASONING,
            MetricEvidence::placeholder(),
            weights,
        );
        score.fallback = true;
        score
    }

    /// Neutral score for an agent that won because it was the only one left
    pub fn by_default(agent_id: impl Into<String>, weights: &WeightVector) -> Self {
        Self::new(
            agent_id,
            MetricScores::flat(NEUTRAL_METRIC),
            "won by default: only successful agent",
            MetricEvidence::placeholder(),
            weights,
        )
    }

    /// Replace the metrics and recompute the base total (clears any penalty)
    pub fn rescore(&mut self, metrics: MetricScores, weights: &WeightVector) {
        self.metrics = metrics;
        self.base_total = weighted_total(&metrics, weights);
        self.total = self.base_total;
        self.penalized = false;
    }

    pub fn evidence_coverage(&self) -> f64 {
        self.evidence.coverage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scenario_a_default_total() {
        let score = JudgeScore::by_default("agent-1", &WeightVector::DEFAULT);
        assert_eq!(score.base_total, 20);
        assert_eq!(score.total, 20);
        assert_eq!(score.metrics, MetricScores::flat(5.0));
    }

    #[test]
    fn test_scenario_b_weighted_total() {
        let metrics = MetricScores::new(8.0, 7.0, 9.0, 6.0);
        assert_eq!(weighted_total(&metrics, &WeightVector::DEFAULT), 30);
    }

    #[test]
    fn test_scenario_c_penalty() {
        assert_eq!(penalized_total(32, 0.8), 26);
    }

    #[test]
    fn test_metrics_clamped() {
        let metrics = MetricScores::new(12.0, -3.0, f64::NAN, 7.0);
        assert_eq!(metrics.accuracy, 10.0);
        assert_eq!(metrics.completeness, 0.0);
        assert_eq!(metrics.clarity, 0.0);
        assert_eq!(metrics.insight, 7.0);
    }

    #[test]
    fn test_totals_bounded() {
        let max = MetricScores::flat(10.0);
        assert_eq!(weighted_total(&max, &WeightVector::DEFAULT), 40);
        assert_eq!(penalized_total(40, 1.5), 40);
        assert_eq!(penalized_total(0, 0.8), 0);
    }

    #[test]
    fn test_fallback_has_no_coverage() {
        let score = JudgeScore::fallback("agent-2", &WeightVector::DEFAULT);
        assert!(score.fallback);
        assert_eq!(score.evidence_coverage(), 0.0);
        assert_eq!(score.total, 20);
    }

    #[test]
    fn test_coverage_counts_substantive_only() {
        let mut evidence = MetricEvidence::placeholder();
        evidence.accuracy = Evidence::new("uses a HashMap", "correct structure");
        evidence.clarity = Evidence::new("", "missing quote");
        evidence.insight = Evidence::new("notes O(n)", "complexity insight");
        assert_eq!(evidence.coverage(), 0.5);
    }

    #[test]
    fn test_rescore_clears_penalty() {
        let weights = WeightVector::DEFAULT;
        let mut score = JudgeScore::new(
            "a",
            MetricScores::flat(8.0),
            "",
            MetricEvidence::placeholder(),
            &weights,
        );
        score.total = 26;
        score.penalized = true;
        score.rescore(MetricScores::flat(9.0), &weights);
        assert_eq!(score.base_total, 36);
        assert_eq!(score.total, 36);
        assert!(!score.penalized);
    }

    proptest! {
        #[test]
        fn prop_totals_stay_in_range(
            accuracy in 0.0f64..=10.0,
            completeness in 0.0f64..=10.0,
            clarity in 0.0f64..=10.0,
            insight in 0.0f64..=10.0,
            wa in 0.0f64..100.0,
            wb in 0.0f64..100.0,
            wc in 0.0f64..100.0,
            wd in 0.0f64..100.0,
            factor in 0.0f64..=1.0,
        ) {
            let weights = WeightVector::normalize(wa, wb, wc, wd);
            let metrics = MetricScores::new(accuracy, completeness, clarity, insight);
            let score = JudgeScore::new("a", metrics, "", MetricEvidence::placeholder(), &weights);
            prop_assert!(score.base_total <= TOTAL_MAX);
            prop_assert_eq!(score.total, score.base_total);

            let penalized = penalized_total(score.base_total, factor);
            prop_assert!(penalized <= score.base_total);
        }
    }
}
