//! Turning one judge pass into ranked scores

use super::evidence::locate_quote;
use super::objective::{ObjectiveMode, apply_objective};
use super::parsing::ParsedJudgeOutput;
use super::ranking::rank;
use super::score::{JudgeScore, Metric};
use super::similarity::{DiversityPolicy, max_similarities};
use super::verdict::PanelRun;
use super::weights::WeightVector;
use crate::agent::AgentRunResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything that shapes a total besides the judge's raw metrics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weights: WeightVector,
    pub diversity: DiversityPolicy,
    pub objective_mode: ObjectiveMode,
}

/// Max similarity of each usable result against the others
pub fn similarity_map(results: &[AgentRunResult]) -> HashMap<String, f64> {
    let texts: Vec<(String, String)> = results
        .iter()
        .map(|r| (r.agent_id.clone(), r.comparison_text()))
        .collect();
    max_similarities(&texts)
}

/// Score every result from one judge pass, before the diversity penalty.
///
/// Parsed entries get their evidence localized in the agent's response and
/// the objective correction applied; missing entries become fallback scores.
pub fn corrected_scores(
    parsed: Option<&ParsedJudgeOutput>,
    results: &[AgentRunResult],
    policy: &ScoringPolicy,
) -> Vec<JudgeScore> {
    results
        .iter()
        .map(|result| {
            let Some(entry) = parsed.and_then(|p| p.get(&result.agent_id)) else {
                return JudgeScore::fallback(&result.agent_id, &policy.weights);
            };

            let mut evidence = entry.evidence.clone();
            for metric in Metric::ALL {
                let item = evidence.get_mut(metric);
                if item.is_substantive() {
                    item.location = locate_quote(&item.quote, &result.response);
                }
            }

            let mut score = JudgeScore::new(
                &result.agent_id,
                entry.metrics,
                entry.reasoning.clone(),
                evidence,
                &policy.weights,
            );
            apply_objective(policy.objective_mode, &mut score, result, &policy.weights);
            score
        })
        .collect()
}

/// Score one judge pass end to end: correct, penalize, rank.
pub fn score_panel(
    panel: usize,
    parsed: Option<&ParsedJudgeOutput>,
    results: &[AgentRunResult],
    similarities: &HashMap<String, f64>,
    policy: &ScoringPolicy,
) -> PanelRun {
    let mut scores = corrected_scores(parsed, results, policy);
    for score in &mut scores {
        let sim = similarities.get(&score.agent_id).copied().unwrap_or(0.0);
        policy.diversity.apply(score, sim);
    }
    rank(&mut scores);

    PanelRun {
        panel,
        winner_id: scores
            .first()
            .map(|s| s.agent_id.clone())
            .unwrap_or_default(),
        fallback: parsed.is_none(),
        scores,
    }
}
