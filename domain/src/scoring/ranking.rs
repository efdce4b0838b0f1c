//! Winner resolution
//!
//! Scores are ordered by total, then accuracy, completeness and insight,
//! all descending, with the agent id ascending as the final tie-break. The
//! order is total: two distinct agents never compare equal.

use super::score::JudgeScore;
use std::cmp::Ordering;

/// Ordering with the better score first
pub fn compare_scores(a: &JudgeScore, b: &JudgeScore) -> Ordering {
    b.total
        .cmp(&a.total)
        .then_with(|| b.metrics.accuracy.total_cmp(&a.metrics.accuracy))
        .then_with(|| b.metrics.completeness.total_cmp(&a.metrics.completeness))
        .then_with(|| b.metrics.insight.total_cmp(&a.metrics.insight))
        .then_with(|| a.agent_id.cmp(&b.agent_id))
}

/// Sort scores best-first in place
pub fn rank(scores: &mut [JudgeScore]) {
    scores.sort_by(compare_scores);
}

/// The best score, if any
pub fn select_winner(scores: &[JudgeScore]) -> Option<&JudgeScore> {
    scores.iter().min_by(|a, b| compare_scores(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score::{MetricEvidence, MetricScores};
    use crate::scoring::weights::WeightVector;
    use proptest::prelude::*;

    fn score(id: &str, total: u8, acc: f64, comp: f64, ins: f64) -> JudgeScore {
        let mut s = JudgeScore::new(
            id,
            MetricScores::new(acc, comp, 5.0, ins),
            "",
            MetricEvidence::placeholder(),
            &WeightVector::DEFAULT,
        );
        s.base_total = total;
        s.total = total;
        s
    }

    #[test]
    fn test_total_wins() {
        let scores = vec![score("a", 28, 9.0, 9.0, 9.0), score("b", 30, 5.0, 5.0, 5.0)];
        assert_eq!(select_winner(&scores).unwrap().agent_id, "b");
    }

    #[test]
    fn test_tie_break_cascade() {
        let acc = vec![score("a", 30, 7.0, 9.0, 9.0), score("b", 30, 8.0, 1.0, 1.0)];
        assert_eq!(select_winner(&acc).unwrap().agent_id, "b");

        let comp = vec![score("a", 30, 8.0, 6.0, 9.0), score("b", 30, 8.0, 7.0, 1.0)];
        assert_eq!(select_winner(&comp).unwrap().agent_id, "b");

        let ins = vec![score("a", 30, 8.0, 7.0, 5.0), score("b", 30, 8.0, 7.0, 6.0)];
        assert_eq!(select_winner(&ins).unwrap().agent_id, "b");

        let id = vec![score("b", 30, 8.0, 7.0, 6.0), score("a", 30, 8.0, 7.0, 6.0)];
        assert_eq!(select_winner(&id).unwrap().agent_id, "a");
    }

    #[test]
    fn test_rank_orders_best_first() {
        let mut scores = vec![
            score("c", 20, 5.0, 5.0, 5.0),
            score("a", 35, 9.0, 9.0, 9.0),
            score("b", 35, 8.0, 9.0, 9.0),
        ];
        rank(&mut scores);
        let ids: Vec<_> = scores.iter().map(|s| s.agent_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty() {
        assert!(select_winner(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_order_is_total_and_antisymmetric(
            t1 in 0u8..=40, t2 in 0u8..=40,
            a1 in 0.0f64..10.0, a2 in 0.0f64..10.0,
            c1 in 0.0f64..10.0, c2 in 0.0f64..10.0,
        ) {
            let x = score("x", t1, a1, c1, 5.0);
            let y = score("y", t2, a2, c2, 5.0);
            let xy = compare_scores(&x, &y);
            prop_assert_ne!(xy, Ordering::Equal);
            prop_assert_eq!(xy, compare_scores(&y, &x).reverse());
        }
    }
}
