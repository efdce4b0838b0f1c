//! Objective domain corrections derived from tool telemetry
//!
//! Some categories can check a judge's free-text opinion against what the
//! agent verifiably did. The coding scheme rewards executed verification,
//! passing tests and clean lint/typecheck runs, and punishes claims of
//! passing tests that no observed test execution backs up.

use super::score::{JudgeScore, MetricScores, ObjectiveAdjustment};
use super::weights::WeightVector;
use crate::agent::{AgentRunResult, ToolCallKind};
use serde::{Deserialize, Serialize};

const JUDGE_SHARE_ACCURACY: f64 = 0.72;
const JUDGE_SHARE_COMPLETENESS: f64 = 0.82;

const BASE_SCORE: f64 = 3.0;
const VERIFICATION_BONUS: f64 = 2.0;
const TEST_PASS_WEIGHT: f64 = 4.0;
const UNBACKED_CLAIM_PENALTY: f64 = 3.0;
const STATIC_CHECK_BONUS: f64 = 1.0;

const PASSING_TEST_CLAIMS: &[&str] = &[
    "tests pass",
    "tests passed",
    "all tests pass",
    "test suite passes",
    "passing tests",
    "tests are passing",
];

/// Which objective correction, if any, a domain applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    #[default]
    None,
    CodingVerification,
}

impl ObjectiveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveMode::None => "none",
            ObjectiveMode::CodingVerification => "coding_verification",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ObjectiveMode::None)
    }
}

/// Deterministic 0–10 verification score for a coding answer, with notes
pub fn coding_verification_score(result: &AgentRunResult) -> (f64, Vec<String>) {
    let telemetry = &result.telemetry;
    let mut score = BASE_SCORE;
    let mut notes = Vec::new();

    let verified = telemetry
        .calls
        .iter()
        .any(|c| c.success && c.kind().is_verification());
    if verified {
        score += VERIFICATION_BONUS;
        notes.push("executed at least one verification tool call".to_string());
    }

    let attempted = telemetry.calls_of(ToolCallKind::Test).count();
    let passed = telemetry
        .calls_of(ToolCallKind::Test)
        .filter(|c| c.success)
        .count();
    if attempted > 0 {
        let ratio = passed as f64 / attempted as f64;
        score += TEST_PASS_WEIGHT * ratio;
        notes.push(format!("{}/{} test runs passed", passed, attempted));
    }

    let lower = result.response.to_lowercase();
    let claims_passing = PASSING_TEST_CLAIMS.iter().any(|c| lower.contains(c));
    if claims_passing && attempted == 0 {
        score -= UNBACKED_CLAIM_PENALTY;
        notes.push("claims passing tests but no test execution was observed".to_string());
    }

    let static_ok = telemetry
        .calls
        .iter()
        .any(|c| c.success && matches!(c.kind(), ToolCallKind::Lint | ToolCallKind::TypeCheck));
    if static_ok {
        score += STATIC_CHECK_BONUS;
        notes.push("lint/typecheck succeeded".to_string());
    }

    (score.clamp(0.0, 10.0), notes)
}

/// Blend the objective score into accuracy and completeness, recompute the
/// base total and record the adjustment. No-op for [`ObjectiveMode::None`].
pub fn apply_objective(
    mode: ObjectiveMode,
    score: &mut JudgeScore,
    result: &AgentRunResult,
    weights: &WeightVector,
) {
    let (objective, notes) = match mode {
        ObjectiveMode::None => return,
        ObjectiveMode::CodingVerification => coding_verification_score(result),
    };

    let before = score.metrics;
    let accuracy =
        JUDGE_SHARE_ACCURACY * before.accuracy + (1.0 - JUDGE_SHARE_ACCURACY) * objective;
    let completeness = JUDGE_SHARE_COMPLETENESS * before.completeness
        + (1.0 - JUDGE_SHARE_COMPLETENESS) * objective;

    let blended = MetricScores::new(accuracy, completeness, before.clarity, before.insight);
    score.rescore(blended, weights);
    score.objective_adjustment = Some(ObjectiveAdjustment {
        scheme: mode.as_str().to_string(),
        objective_score: objective,
        accuracy_delta: blended.accuracy - before.accuracy,
        completeness_delta: blended.completeness - before.completeness,
        notes,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Persona, ToolCallRecord, ToolTelemetry};
    use crate::scoring::score::MetricEvidence;

    fn result_with(response: &str, calls: Vec<ToolCallRecord>) -> AgentRunResult {
        AgentRunResult::success("agent-1", Persona::Analytical, response, vec![])
            .with_telemetry(ToolTelemetry::from_calls(calls))
    }

    #[test]
    fn test_no_tools_base_score() {
        let (score, notes) = coding_verification_score(&result_with("fn main() {}", vec![]));
        assert_eq!(score, 3.0);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_all_tests_passing_with_lint() {
        let calls = vec![
            ToolCallRecord::new("shell", 1, true).with_command("cargo test"),
            ToolCallRecord::new("shell", 2, true).with_command("cargo clippy"),
        ];
        let (score, notes) = coding_verification_score(&result_with("done", calls));
        // 3 base + 2 verified + 4 (1/1 tests) + 1 lint
        assert_eq!(score, 10.0);
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn test_half_tests_passing() {
        let calls = vec![
            ToolCallRecord::new("shell", 1, false).with_command("pytest"),
            ToolCallRecord::new("shell", 2, true).with_command("pytest"),
        ];
        let (score, _) = coding_verification_score(&result_with("fixed", calls));
        assert_eq!(score, 3.0 + 2.0 + 2.0);
    }

    #[test]
    fn test_unbacked_claim_penalized() {
        let (score, notes) =
            coding_verification_score(&result_with("All tests pass now.", vec![]));
        assert_eq!(score, 0.0);
        assert!(notes[0].contains("claims passing tests"));
    }

    #[test]
    fn test_apply_blends_and_records() {
        let weights = WeightVector::DEFAULT;
        let mut score = JudgeScore::new(
            "agent-1",
            MetricScores::new(10.0, 10.0, 8.0, 8.0),
            "",
            MetricEvidence::placeholder(),
            &weights,
        );
        let result = result_with("All tests pass now.", vec![]);

        apply_objective(ObjectiveMode::CodingVerification, &mut score, &result, &weights);

        // objective = 0 → accuracy 7.2, completeness 8.2
        assert!((score.metrics.accuracy - 7.2).abs() < 1e-9);
        assert!((score.metrics.completeness - 8.2).abs() < 1e-9);
        let adj = score.objective_adjustment.as_ref().unwrap();
        assert!((adj.accuracy_delta + 2.8).abs() < 1e-9);
        assert!((adj.completeness_delta + 1.8).abs() < 1e-9);
        // 0.3*7.2 + 0.3*8.2 + 0.2*8 + 0.2*8 = 7.82 → 31.28 → 31
        assert_eq!(score.base_total, 31);
        assert_eq!(score.total, 31);
    }

    #[test]
    fn test_mode_none_is_noop() {
        let weights = WeightVector::DEFAULT;
        let mut score = JudgeScore::new(
            "a",
            MetricScores::flat(7.0),
            "",
            MetricEvidence::placeholder(),
            &weights,
        );
        let before = score.clone();
        apply_objective(ObjectiveMode::None, &mut score, &result_with("x", vec![]), &weights);
        assert_eq!(score, before);
    }
}
