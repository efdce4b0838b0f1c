//! Consensus aggregation across independent judge panels
//!
//! Each panel scores every agent on its own. The consensus score of an agent
//! is the per-metric median across panels of the objectively corrected
//! metrics; the base total is recomputed from those medians and the diversity
//! penalty is applied exactly once afterwards.

use super::ranking::rank;
use super::score::{JudgeScore, MetricScores, TOTAL_MAX};
use super::similarity::DiversityPolicy;
use super::verdict::PanelRun;
use super::weights::WeightVector;
use std::collections::HashMap;

/// Median of a slice (mean of the middle pair for even lengths), `None` if empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Merge panel scores into one ranked score list.
///
/// `agent_ids` fixes the agent set; an agent missing from every panel gets a
/// fallback score. Reasoning and evidence come from the agent's best-covered
/// non-fallback panel entry.
pub fn aggregate_panels(
    panels: &[PanelRun],
    agent_ids: &[String],
    similarities: &HashMap<String, f64>,
    weights: &WeightVector,
    diversity: &DiversityPolicy,
) -> Vec<JudgeScore> {
    let mut merged: Vec<JudgeScore> = agent_ids
        .iter()
        .map(|id| {
            let entries: Vec<&JudgeScore> = panels
                .iter()
                .filter_map(|p| p.scores.iter().find(|s| &s.agent_id == id))
                .collect();
            merge_agent(id, &entries, weights)
        })
        .collect();

    for score in &mut merged {
        let sim = similarities.get(&score.agent_id).copied().unwrap_or(0.0);
        diversity.apply(score, sim);
    }

    rank(&mut merged);
    merged
}

fn merge_agent(agent_id: &str, entries: &[&JudgeScore], weights: &WeightVector) -> JudgeScore {
    let column = |f: fn(&MetricScores) -> f64| -> Option<f64> {
        let values: Vec<f64> = entries.iter().map(|s| f(&s.metrics)).collect();
        median(&values)
    };

    let (Some(accuracy), Some(completeness), Some(clarity), Some(insight)) = (
        column(|m| m.accuracy),
        column(|m| m.completeness),
        column(|m| m.clarity),
        column(|m| m.insight),
    ) else {
        return JudgeScore::fallback(agent_id, weights);
    };

    let source = entries
        .iter()
        .filter(|s| !s.fallback)
        .max_by(|a, b| a.evidence_coverage().total_cmp(&b.evidence_coverage()))
        .or_else(|| entries.first())
        .copied();

    let Some(source) = source else {
        return JudgeScore::fallback(agent_id, weights);
    };

    let metrics = MetricScores::new(accuracy, completeness, clarity, insight);
    let mut score = JudgeScore::new(
        agent_id,
        metrics,
        source.reasoning.clone(),
        source.evidence.clone(),
        weights,
    );
    score.objective_adjustment = source.objective_adjustment.clone();
    score.fallback = entries.iter().all(|s| s.fallback);
    score
}

/// Mean over agents of (max − min panel total) / 40; 0 for fewer than 2 panels
pub fn disagreement_index(panels: &[PanelRun], agent_ids: &[String]) -> f64 {
    if panels.len() < 2 || agent_ids.is_empty() {
        return 0.0;
    }

    let spreads: Vec<f64> = agent_ids
        .iter()
        .map(|id| {
            let totals: Vec<u8> = panels.iter().filter_map(|p| p.total_for(id)).collect();
            match (totals.iter().max(), totals.iter().min()) {
                (Some(max), Some(min)) => f64::from(max - min) / f64::from(TOTAL_MAX),
                _ => 0.0,
            }
        })
        .collect();

    spreads.iter().sum::<f64>() / spreads.len() as f64
}

/// Fraction of panels whose own winner equals `winner_id`
pub fn panel_agreement(panels: &[PanelRun], winner_id: &str) -> f64 {
    if panels.is_empty() {
        return 1.0;
    }
    let agreeing = panels.iter().filter(|p| p.winner_id == winner_id).count();
    agreeing as f64 / panels.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score::MetricEvidence;

    fn score(id: &str, metrics: MetricScores) -> JudgeScore {
        JudgeScore::new(
            id,
            metrics,
            "ok",
            MetricEvidence::placeholder(),
            &WeightVector::DEFAULT,
        )
    }

    fn panel(n: usize, winner: &str, scores: Vec<JudgeScore>) -> PanelRun {
        PanelRun {
            panel: n,
            scores,
            winner_id: winner.to_string(),
            fallback: false,
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_scenario_e_panel_agreement() {
        let panels = vec![
            panel(1, "agent-a", vec![]),
            panel(2, "agent-a", vec![]),
            panel(3, "agent-b", vec![]),
        ];
        let agreement = panel_agreement(&panels, "agent-a");
        assert!((agreement - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_medians_over_metrics_not_totals() {
        let panels = vec![
            panel(1, "a", vec![score("a", MetricScores::new(8.0, 8.0, 8.0, 8.0))]),
            panel(2, "a", vec![score("a", MetricScores::new(6.0, 9.0, 7.0, 5.0))]),
            panel(3, "a", vec![score("a", MetricScores::new(7.0, 7.0, 9.0, 6.0))]),
        ];
        let merged = aggregate_panels(
            &panels,
            &ids(&["a"]),
            &HashMap::new(),
            &WeightVector::DEFAULT,
            &DiversityPolicy::default(),
        );
        assert_eq!(merged[0].metrics, MetricScores::new(7.0, 8.0, 8.0, 6.0));
        // 4 * (0.3*7 + 0.3*8 + 0.2*8 + 0.2*6) = 29.2
        assert_eq!(merged[0].base_total, 29);
        assert!(!merged[0].penalized);
    }

    #[test]
    fn test_penalty_applied_once_after_merge() {
        let panels = vec![
            panel(1, "a", vec![score("a", MetricScores::flat(8.0))]),
            panel(2, "a", vec![score("a", MetricScores::flat(8.0))]),
        ];
        let sims = HashMap::from([("a".to_string(), 0.9)]);
        let merged = aggregate_panels(
            &panels,
            &ids(&["a"]),
            &sims,
            &WeightVector::DEFAULT,
            &DiversityPolicy::default(),
        );
        assert_eq!(merged[0].base_total, 32);
        assert_eq!(merged[0].total, 26);
        assert!(merged[0].penalized);
    }

    #[test]
    fn test_agent_missing_everywhere_falls_back() {
        let panels = vec![panel(1, "a", vec![score("a", MetricScores::flat(9.0))])];
        let merged = aggregate_panels(
            &panels,
            &ids(&["a", "b"]),
            &HashMap::new(),
            &WeightVector::DEFAULT,
            &DiversityPolicy::default(),
        );
        let b = merged.iter().find(|s| s.agent_id == "b").unwrap();
        assert!(b.fallback);
        assert_eq!(b.total, 20);
        assert_eq!(merged[0].agent_id, "a");
    }

    #[test]
    fn test_disagreement_index() {
        let panels = vec![
            panel(
                1,
                "a",
                vec![score("a", MetricScores::flat(9.0)), score("b", MetricScores::flat(5.0))],
            ),
            panel(
                2,
                "a",
                vec![score("a", MetricScores::flat(7.0)), score("b", MetricScores::flat(5.0))],
            ),
        ];
        // a: 36 vs 28 → 8/40; b: 20 vs 20 → 0
        let index = disagreement_index(&panels, &ids(&["a", "b"]));
        assert!((index - 0.1).abs() < 1e-12);
        assert_eq!(disagreement_index(&panels[..1], &ids(&["a"])), 0.0);
    }
}
