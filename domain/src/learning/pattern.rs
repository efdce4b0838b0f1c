//! Pattern extraction from a winning run

use crate::agent::{AgentRunResult, ReasoningStep};
use crate::core::category::TaskCategory;
use crate::core::string::{collapse_whitespace, truncate};

/// Body used when the winner left no reasoning to transfer
pub const NO_TRANSFERABLE_PATTERN: &str = "[no-transferable-pattern]";

const MAX_STEPS: usize = 3;
const FALLBACK_STEPS: usize = 2;
const STRONG_CONFIDENCE: f64 = 0.8;
const FAIR_CONFIDENCE: f64 = 0.7;
const MAX_STEP_LEN: usize = 160;

/// Up to 3 steps with confidence ≥ 0.8, else ≥ 0.7, else the first 2
pub fn select_steps(reasoning: &[ReasoningStep]) -> Vec<&ReasoningStep> {
    for floor in [STRONG_CONFIDENCE, FAIR_CONFIDENCE] {
        let picked: Vec<&ReasoningStep> = reasoning
            .iter()
            .filter(|s| s.confidence >= floor)
            .take(MAX_STEPS)
            .collect();
        if !picked.is_empty() {
            return picked;
        }
    }
    reasoning.iter().take(FALLBACK_STEPS).collect()
}

/// `[persona:<p>][category:<c>][tools:<a>→<b>] step1 | step2 | step3`
pub fn extract_pattern(winner: &AgentRunResult, category: TaskCategory) -> String {
    let tools = winner.telemetry.sequence();
    let tools = if tools.is_empty() {
        "none".to_string()
    } else {
        tools.join("→")
    };

    let steps: Vec<String> = select_steps(&winner.reasoning)
        .into_iter()
        .map(|s| truncate(&collapse_whitespace(&s.thought), MAX_STEP_LEN))
        .filter(|s| !s.is_empty())
        .collect();
    let body = if steps.is_empty() {
        NO_TRANSFERABLE_PATTERN.to_string()
    } else {
        steps.join(" | ")
    };

    format!(
        "[persona:{}][category:{}][tools:{}] {}",
        winner.persona, category, tools, body
    )
}

/// Whether a pattern carries any reasoning worth injecting into a prompt
pub fn is_transferable(pattern: &str) -> bool {
    !pattern.contains(NO_TRANSFERABLE_PATTERN)
}
