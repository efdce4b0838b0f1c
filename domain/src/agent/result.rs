//! Agent run results and reasoning steps

use super::persona::Persona;
use super::telemetry::ToolTelemetry;
use serde::{Deserialize, Serialize};

/// Lower bound of a derived step confidence
pub const MIN_STEP_CONFIDENCE: f64 = 0.55;
/// Upper bound of a derived step confidence
pub const MAX_STEP_CONFIDENCE: f64 = 0.95;

/// Derive a deterministic confidence in [0.55, 0.95] from a thought's text.
///
/// Each signal adds 0.10 to the 0.55 floor: cited evidence or numbers, an
/// explicit verification, a substantive length (> 80 chars), and a drawn
/// conclusion.
pub fn derive_step_confidence(thought: &str) -> f64 {
    let lower = thought.to_lowercase();
    let mut confidence = MIN_STEP_CONFIDENCE;

    let cites_evidence = lower.chars().any(|c| c.is_ascii_digit())
        || ["because", "evidence", "according", "source", "shows"]
            .iter()
            .any(|w| lower.contains(w));
    if cites_evidence {
        confidence += 0.10;
    }

    if ["verify", "verified", "check", "test", "confirm"]
        .iter()
        .any(|w| lower.contains(w))
    {
        confidence += 0.10;
    }

    if thought.chars().count() > 80 {
        confidence += 0.10;
    }

    if ["therefore", "thus", "hence", "so the", "which means"]
        .iter()
        .any(|w| lower.contains(w))
    {
        confidence += 0.10;
    }

    (confidence.clamp(MIN_STEP_CONFIDENCE, MAX_STEP_CONFIDENCE) * 100.0).round() / 100.0
}

/// One step of an agent's reasoning trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Monotonic per-agent step index (1-indexed)
    pub index: u32,
    pub thought: String,
    /// Derived confidence in [0.55, 0.95]
    pub confidence: f64,
}

impl ReasoningStep {
    /// Create a step, deriving its confidence from the thought text
    pub fn new(index: u32, thought: impl Into<String>) -> Self {
        let thought = thought.into();
        let confidence = derive_step_confidence(&thought);
        Self {
            index,
            thought,
            confidence,
        }
    }
}

/// Token and wall-clock cost of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCost {
    pub tokens: u64,
    pub duration_ms: u64,
}

/// Result of one agent's attempt at a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunResult {
    pub agent_id: String,
    pub persona: Persona,
    pub response: String,
    pub reasoning: Vec<ReasoningStep>,
    pub cost: RunCost,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub telemetry: ToolTelemetry,
}

impl AgentRunResult {
    /// Creates a successful result
    pub fn success(
        agent_id: impl Into<String>,
        persona: Persona,
        response: impl Into<String>,
        reasoning: Vec<ReasoningStep>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            persona,
            response: response.into(),
            reasoning,
            cost: RunCost::default(),
            success: true,
            error: None,
            telemetry: ToolTelemetry::default(),
        }
    }

    /// Creates a failed result carrying the error description
    pub fn failure(agent_id: impl Into<String>, persona: Persona, error: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            persona,
            response: String::new(),
            reasoning: Vec::new(),
            cost: RunCost::default(),
            success: false,
            error: Some(error.into()),
            telemetry: ToolTelemetry::default(),
        }
    }

    pub fn with_cost(mut self, cost: RunCost) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_telemetry(mut self, telemetry: ToolTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Successful with a non-empty response, so eligible for judging
    pub fn is_usable(&self) -> bool {
        self.success && !self.response.trim().is_empty()
    }

    /// Response followed by every reasoning thought, for similarity checks
    pub fn comparison_text(&self) -> String {
        let mut text = self.response.clone();
        for step in &self.reasoning {
            text.push('\n');
            text.push_str(&step.thought);
        }
        text
    }
}
