//! Token-set similarity and the diversity penalty
//!
//! Near-duplicate answers should not both score well. Every usable agent's
//! response + reasoning is reduced to a token set; the Jaccard similarity
//! against every other agent is computed and the maximum decides whether the
//! agent's total is penalized.

use super::score::{JudgeScore, penalized_total};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default similarity at or above which the penalty applies
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.72;
/// Default multiplier applied to a penalized total
pub const DEFAULT_PENALTY_FACTOR: f64 = 0.8;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "this", "that", "with", "from", "they", "will", "would",
    "there", "their", "what", "when", "which", "who", "were", "been", "into", "than", "then",
    "them", "these", "those", "its", "also", "just", "only", "some", "such", "more", "most",
    "very", "each", "other", "about", "over", "your", "may", "should", "could", "because",
];

/// Diversity penalty settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityPolicy {
    pub threshold: f64,
    pub factor: f64,
}

impl Default for DiversityPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            factor: DEFAULT_PENALTY_FACTOR,
        }
    }
}

impl DiversityPolicy {
    /// Set `max_similarity`, and `total` from `base_total` with or without penalty
    pub fn apply(&self, score: &mut JudgeScore, max_similarity: f64) {
        score.max_similarity = max_similarity;
        if max_similarity >= self.threshold {
            score.total = penalized_total(score.base_total, self.factor);
            score.penalized = true;
        } else {
            score.total = score.base_total;
            score.penalized = false;
        }
    }
}

/// Lower-cased alphanumeric tokens longer than 2 chars, stop words removed
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 2)
        .map(str::to_lowercase)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Jaccard similarity of two token sets; two empty sets are dissimilar
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// For each `(agent_id, text)`, the maximum similarity against any other entry
pub fn max_similarities(texts: &[(String, String)]) -> HashMap<String, f64> {
    let tokens: Vec<HashSet<String>> = texts.iter().map(|(_, t)| tokenize(t)).collect();
    let mut max: HashMap<String, f64> = texts.iter().map(|(id, _)| (id.clone(), 0.0)).collect();

    for i in 0..texts.len() {
        for j in (i + 1)..texts.len() {
            let sim = jaccard(&tokens[i], &tokens[j]);
            for idx in [i, j] {
                if let Some(entry) = max.get_mut(&texts[idx].0)
                    && sim > *entry
                {
                    *entry = sim;
                }
            }
        }
    }

    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score::{MetricEvidence, MetricScores, TOTAL_MAX};
    use crate::scoring::weights::WeightVector;
    use proptest::prelude::*;

    #[test]
    fn test_tokenize_filters() {
        let tokens = tokenize("The cat and a DOG ran: to-the park, 42 times!");
        let mut sorted: Vec<_> = tokens.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["cat", "dog", "park", "ran", "times"]);
    }

    #[test]
    fn test_jaccard() {
        let a = tokenize("apple banana cherry");
        let b = tokenize("banana cherry durian");
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn test_max_similarities() {
        let texts = vec![
            ("a".to_string(), "merge sort splits arrays recursively".to_string()),
            ("b".to_string(), "merge sort splits arrays recursively".to_string()),
            ("c".to_string(), "hash tables give constant lookups".to_string()),
        ];
        let max = max_similarities(&texts);
        assert_eq!(max["a"], 1.0);
        assert_eq!(max["b"], 1.0);
        assert_eq!(max["c"], 0.0);
    }

    #[test]
    fn test_single_agent_has_zero_similarity() {
        let max = max_similarities(&[("solo".to_string(), "anything here".to_string())]);
        assert_eq!(max["solo"], 0.0);
    }

    fn score_with_base(base: u8) -> JudgeScore {
        let mut score = JudgeScore::new(
            "a",
            MetricScores::flat(5.0),
            "",
            MetricEvidence::placeholder(),
            &WeightVector::DEFAULT,
        );
        score.base_total = base;
        score.total = base;
        score
    }

    #[test]
    fn test_scenario_c_near_duplicate_penalized() {
        let mut score = score_with_base(32);
        DiversityPolicy::default().apply(&mut score, 0.9);
        assert!(score.penalized);
        assert_eq!(score.total, 26);
        assert_eq!(score.base_total, 32);
    }

    #[test]
    fn test_below_threshold_untouched() {
        let mut score = score_with_base(32);
        DiversityPolicy::default().apply(&mut score, 0.71);
        assert!(!score.penalized);
        assert_eq!(score.total, 32);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut score = score_with_base(30);
        DiversityPolicy::default().apply(&mut score, 0.72);
        assert_eq!(score.total, 24);
    }

    proptest! {
        #[test]
        fn prop_penalty_applies_only_at_threshold(
            base in 0u8..=40,
            similarity in 0.0f64..=1.0,
        ) {
            let mut score = score_with_base(base);
            DiversityPolicy::default().apply(&mut score, similarity);

            let expected = if similarity >= DEFAULT_SIMILARITY_THRESHOLD {
                (f64::from(base) * DEFAULT_PENALTY_FACTOR).round() as u8
            } else {
                base
            };
            prop_assert_eq!(score.total, expected);
            prop_assert_eq!(score.base_total, base);
            prop_assert_eq!(score.penalized, similarity >= DEFAULT_SIMILARITY_THRESHOLD);
            prop_assert!(score.total <= TOTAL_MAX);
        }
    }
}
