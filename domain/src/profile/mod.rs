//! Per-category defaults: tools, judging policy, weights and prompt hints

use crate::core::category::TaskCategory;
use crate::scoring::{JudgeMode, ObjectiveMode, WeightVector};
use serde::{Deserialize, Serialize};

/// Category defaults before any explicit override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainProfile {
    pub category: TaskCategory,
    pub default_tools: Vec<String>,
    pub default_judge_mode: JudgeMode,
    pub default_weights: WeightVector,
    pub objective_mode: ObjectiveMode,
    pub prompt_hints: Vec<String>,
}

impl DomainProfile {
    pub fn for_category(category: TaskCategory) -> Self {
        let (tools, mode, weights, objective, hints): (
            &[&str],
            JudgeMode,
            (f64, f64, f64, f64),
            ObjectiveMode,
            &[&str],
        ) = match category {
            TaskCategory::General => (
                &["web_search"],
                JudgeMode::Single,
                (0.30, 0.30, 0.20, 0.20),
                ObjectiveMode::None,
                &[
                    "Answer the question directly before adding context.",
                    "State any assumption you rely on.",
                ],
            ),
            TaskCategory::Coding => (
                &["code_exec", "shell", "file_io"],
                JudgeMode::Consensus,
                (0.40, 0.30, 0.15, 0.15),
                ObjectiveMode::CodingVerification,
                &[
                    "Run the tests you mention; do not claim results you did not observe.",
                    "Prefer the smallest change that fixes the problem.",
                    "Show the final code in full.",
                ],
            ),
            TaskCategory::Math => (
                &["code_exec"],
                JudgeMode::Consensus,
                (0.45, 0.25, 0.15, 0.15),
                ObjectiveMode::None,
                &[
                    "Show each derivation step.",
                    "Check the final result numerically when possible.",
                ],
            ),
            TaskCategory::Research => (
                &["web_search", "file_io"],
                JudgeMode::Consensus,
                (0.30, 0.35, 0.15, 0.20),
                ObjectiveMode::None,
                &[
                    "Cite a source for every factual claim.",
                    "Separate established findings from speculation.",
                ],
            ),
            TaskCategory::Creative => (
                &[],
                JudgeMode::Single,
                (0.15, 0.20, 0.30, 0.35),
                ObjectiveMode::None,
                &["Favor an original angle over a safe one."],
            ),
        };

        Self {
            category,
            default_tools: tools.iter().map(|t| t.to_string()).collect(),
            default_judge_mode: mode,
            default_weights: WeightVector::normalize(weights.0, weights.1, weights.2, weights.3),
            objective_mode: objective,
            prompt_hints: hints.iter().map(|h| h.to_string()).collect(),
        }
    }
}

/// Explicit choices that beat category defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanOverrides {
    pub tools: Option<Vec<String>>,
    pub judge_mode: Option<JudgeMode>,
    pub weights: Option<WeightVector>,
}

/// A profile with overrides applied, ready for one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainPlan {
    pub category: TaskCategory,
    pub tools: Vec<String>,
    pub judge_mode: JudgeMode,
    pub weights: WeightVector,
    pub objective_mode: ObjectiveMode,
    pub prompt_hints: Vec<String>,
}

pub fn resolve_plan(category: TaskCategory, overrides: &PlanOverrides) -> DomainPlan {
    let profile = DomainProfile::for_category(category);
    DomainPlan {
        category,
        tools: overrides
            .tools
            .clone()
            .unwrap_or(profile.default_tools),
        judge_mode: overrides.judge_mode.unwrap_or(profile.default_judge_mode),
        weights: overrides
            .weights
            .map(|w| w.normalized())
            .unwrap_or(profile.default_weights),
        objective_mode: profile.objective_mode,
        prompt_hints: profile.prompt_hints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table() {
        let coding = DomainProfile::for_category(TaskCategory::Coding);
        assert_eq!(coding.default_tools, vec!["code_exec", "shell", "file_io"]);
        assert_eq!(coding.default_judge_mode, JudgeMode::Consensus);
        assert_eq!(coding.objective_mode, ObjectiveMode::CodingVerification);
        assert!((coding.default_weights.accuracy - 0.40).abs() < 1e-12);

        let creative = DomainProfile::for_category(TaskCategory::Creative);
        assert!(creative.default_tools.is_empty());
        assert_eq!(creative.default_judge_mode, JudgeMode::Single);
        assert!((creative.default_weights.insight - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_every_profile_weights_sum_to_one() {
        for category in TaskCategory::ALL {
            let profile = DomainProfile::for_category(category);
            assert!((profile.default_weights.sum() - 1.0).abs() < 1e-9);
            assert!(!profile.prompt_hints.is_empty());
        }
    }

    #[test]
    fn test_resolve_without_overrides_uses_defaults() {
        let plan = resolve_plan(TaskCategory::Math, &PlanOverrides::default());
        assert_eq!(plan.judge_mode, JudgeMode::Consensus);
        assert_eq!(plan.tools, vec!["code_exec"]);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = PlanOverrides {
            tools: Some(vec![]),
            judge_mode: Some(JudgeMode::Single),
            weights: Some(WeightVector {
                accuracy: 2.0,
                completeness: 1.0,
                clarity: 1.0,
                insight: 0.0,
            }),
        };
        let plan = resolve_plan(TaskCategory::Coding, &overrides);
        assert!(plan.tools.is_empty());
        assert_eq!(plan.judge_mode, JudgeMode::Single);
        assert!((plan.weights.accuracy - 0.5).abs() < 1e-12);
        assert_eq!(plan.objective_mode, ObjectiveMode::CodingVerification);
    }
}
