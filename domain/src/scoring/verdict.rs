//! Judge verdicts: modes, panels and the aggregated result

use super::score::JudgeScore;
use super::weights::WeightVector;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a race is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeMode {
    /// One judge pass
    #[default]
    Single,
    /// Several independent panels, aggregated by median
    Consensus,
}

impl JudgeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeMode::Single => "single",
            JudgeMode::Consensus => "consensus",
        }
    }
}

impl fmt::Display for JudgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JudgeMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(JudgeMode::Single),
            "consensus" | "panel" => Ok(JudgeMode::Consensus),
            other => Err(DomainError::UnknownJudgeMode(other.to_string())),
        }
    }
}

/// How far a verdict can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "high"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::Low => write!(f, "low"),
        }
    }
}

/// One independent judge pass (consensus mode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRun {
    /// 1-indexed panel number
    pub panel: usize,
    /// Scores ranked best-first
    pub scores: Vec<JudgeScore>,
    pub winner_id: String,
    /// Whether the whole pass fell back to flat scores
    pub fallback: bool,
}

impl PanelRun {
    pub fn total_for(&self, agent_id: &str) -> Option<u8> {
        self.scores
            .iter()
            .find(|s| s.agent_id == agent_id)
            .map(|s| s.total)
    }
}

/// The judge's verdict on a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResult {
    pub winner_id: String,
    pub summary: String,
    pub mode: JudgeMode,
    pub weights: WeightVector,
    /// Scores ranked best-first
    pub scores: Vec<JudgeScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<PanelRun>,
    pub confidence_level: ConfidenceLevel,
    /// Fraction of the winner's metrics backed by substantive evidence
    pub evidence_coverage: f64,
    /// Mean cross-panel total spread / 40 (0 in single mode)
    pub disagreement_index: f64,
    /// Fraction of panels whose own winner matches the final winner
    pub panel_agreement: f64,
}

impl JudgeResult {
    /// Build a single-mode result from ranked scores.
    ///
    /// Returns `None` when `scores` is empty.
    pub fn single(
        scores: Vec<JudgeScore>,
        summary: impl Into<String>,
        weights: WeightVector,
    ) -> Option<Self> {
        let winner = scores.first()?;
        Some(Self {
            winner_id: winner.agent_id.clone(),
            evidence_coverage: winner.evidence_coverage(),
            summary: summary.into(),
            mode: JudgeMode::Single,
            weights,
            scores,
            panels: Vec::new(),
            confidence_level: ConfidenceLevel::default(),
            disagreement_index: 0.0,
            panel_agreement: 1.0,
        })
    }

    pub fn winner(&self) -> Option<&JudgeScore> {
        self.score_for(&self.winner_id)
    }

    /// Best score that is not the winner's
    pub fn runner_up(&self) -> Option<&JudgeScore> {
        self.scores.iter().find(|s| s.agent_id != self.winner_id)
    }

    pub fn score_for(&self, agent_id: &str) -> Option<&JudgeScore> {
        self.scores.iter().find(|s| s.agent_id == agent_id)
    }

    /// Append a note to the human summary without discarding it
    pub fn annotate(&mut self, note: &str) {
        if self.summary.is_empty() {
            self.summary = note.to_string();
        } else {
            self.summary = format!("{} {}", self.summary, note);
        }
    }
}
