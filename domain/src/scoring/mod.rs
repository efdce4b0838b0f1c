//! Judge scoring rules
//!
//! Everything between a raw judge response and a ranked [`JudgeResult`] is a
//! pure function in this module: parsing, evidence localization, objective
//! correction, diversity penalty, ranking and consensus aggregation. The
//! application layer only supplies the model calls.

pub mod consensus;
pub mod evidence;
pub mod objective;
pub mod panel;
pub mod parsing;
pub mod ranking;
pub mod score;
pub mod similarity;
pub mod verdict;
pub mod weights;

pub use consensus::{aggregate_panels, disagreement_index, median, panel_agreement};
pub use evidence::locate_quote;
pub use objective::{ObjectiveMode, apply_objective, coding_verification_score};
pub use panel::{ScoringPolicy, corrected_scores, score_panel, similarity_map};
pub use parsing::{JudgeParseError, ParsedAgentScore, ParsedJudgeOutput, parse_judge_response};
pub use ranking::{compare_scores, rank, select_winner};
pub use score::{
    Evidence, EvidenceSpan, JudgeScore, Metric, MetricEvidence, MetricScores,
    ObjectiveAdjustment, TOTAL_MAX, penalized_total, weighted_total,
};
pub use similarity::{
    DEFAULT_PENALTY_FACTOR, DEFAULT_SIMILARITY_THRESHOLD, DiversityPolicy, jaccard,
    max_similarities, tokenize,
};
pub use verdict::{ConfidenceLevel, JudgeMode, JudgeResult, PanelRun};
pub use weights::WeightVector;
