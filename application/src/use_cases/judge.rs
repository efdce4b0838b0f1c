//! Judge engine
//!
//! Sends the judge prompt through the [`LlmGateway`] and turns the replies
//! into a ranked [`JudgeResult`]. In consensus mode the panels run
//! concurrently and are aggregated by per-metric median. A judge pass that
//! fails or cannot be parsed degrades to fallback scores; judging never
//! fails a race.

use crate::config::JudgeSettings;
use crate::ports::llm_gateway::LlmGateway;
use arena_domain::scoring::{
    ParsedJudgeOutput, aggregate_panels, disagreement_index, panel_agreement, parse_judge_response,
    score_panel, similarity_map,
};
use arena_domain::{
    AgentRunResult, ConfidenceLevel, JudgeMode, JudgePromptTemplate, JudgeResult, JudgeScore,
    Model, ObjectiveMode, ScoringPolicy, TaskCategory, WeightVector,
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Summary used when no judge pass produced one
const FALLBACK_SUMMARY: &str = "judge output could not be parsed; fallback scores used";
/// Summary of a single-candidate verdict
pub const BY_DEFAULT_SUMMARY: &str = "won by default: only successful agent";

#[derive(Error, Debug, PartialEq)]
pub enum JudgeError {
    #[error("no usable agent results to judge")]
    NoCandidates,
}

/// One judging job
#[derive(Debug, Clone)]
pub struct JudgeRequest {
    pub prompt: String,
    pub category: TaskCategory,
    /// Usable results only
    pub results: Vec<AgentRunResult>,
    pub weights: WeightVector,
    pub mode: JudgeMode,
    pub objective_mode: ObjectiveMode,
}

pub struct JudgeEngine<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    settings: JudgeSettings,
}

impl<G: LlmGateway + 'static> JudgeEngine<G> {
    pub fn new(gateway: Arc<G>, settings: JudgeSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn model(&self) -> &Model {
        &self.settings.model
    }

    /// Verdict for a race with exactly one usable answer; no model call
    pub fn by_default(result: &AgentRunResult, weights: WeightVector) -> JudgeResult {
        let score = JudgeScore::by_default(&result.agent_id, &weights);
        JudgeResult {
            winner_id: score.agent_id.clone(),
            summary: BY_DEFAULT_SUMMARY.to_string(),
            mode: JudgeMode::Single,
            weights,
            evidence_coverage: score.evidence_coverage(),
            scores: vec![score],
            panels: Vec::new(),
            confidence_level: ConfidenceLevel::default(),
            disagreement_index: 0.0,
            panel_agreement: 1.0,
        }
    }

    pub async fn judge(&self, request: &JudgeRequest) -> Result<JudgeResult, JudgeError> {
        if request.results.is_empty() {
            return Err(JudgeError::NoCandidates);
        }

        let policy = ScoringPolicy {
            weights: request.weights,
            diversity: self.settings.diversity,
            objective_mode: request.objective_mode,
        };
        let similarities = similarity_map(&request.results);
        let agent_ids: Vec<String> = request
            .results
            .iter()
            .map(|r| r.agent_id.clone())
            .collect();
        let prompt =
            JudgePromptTemplate::judge_prompt(&request.prompt, request.category, &request.results);

        let panel_count = match request.mode {
            JudgeMode::Single => 1,
            JudgeMode::Consensus => self.settings.panel_count.max(1),
        };
        info!(
            "Judging {} answers ({} mode, {} panel(s))",
            agent_ids.len(),
            request.mode,
            panel_count
        );

        let passes = join_all(
            (1..=panel_count).map(|panel| self.run_pass(panel, &prompt, &agent_ids)),
        )
        .await;

        let summary = passes
            .iter()
            .flatten()
            .map(|p| p.summary.clone())
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_SUMMARY.to_string());

        let panels: Vec<_> = passes
            .iter()
            .enumerate()
            .map(|(i, parsed)| {
                score_panel(i + 1, parsed.as_ref(), &request.results, &similarities, &policy)
            })
            .collect();

        let mut result = match request.mode {
            JudgeMode::Single => {
                let scores = panels
                    .into_iter()
                    .next()
                    .map(|p| p.scores)
                    .unwrap_or_default();
                JudgeResult::single(scores, summary, request.weights)
                    .ok_or(JudgeError::NoCandidates)?
            }
            JudgeMode::Consensus => {
                let scores = aggregate_panels(
                    &panels,
                    &agent_ids,
                    &similarities,
                    &request.weights,
                    &self.settings.diversity,
                );
                let winner = scores.first().ok_or(JudgeError::NoCandidates)?;
                JudgeResult {
                    winner_id: winner.agent_id.clone(),
                    summary,
                    mode: JudgeMode::Consensus,
                    weights: request.weights,
                    evidence_coverage: winner.evidence_coverage(),
                    disagreement_index: disagreement_index(&panels, &agent_ids),
                    panel_agreement: panel_agreement(&panels, &winner.agent_id),
                    confidence_level: ConfidenceLevel::default(),
                    scores,
                    panels,
                }
            }
        };

        if result.scores.iter().all(|s| s.fallback) {
            warn!("Every judge pass fell back; verdict is decided by tie-breaks");
            result.summary = FALLBACK_SUMMARY.to_string();
        }

        info!(
            "Judge picked {} (disagreement {:.3}, agreement {:.3})",
            result.winner_id, result.disagreement_index, result.panel_agreement
        );
        Ok(result)
    }

    /// One judge pass; `None` when the call failed or the reply was unusable
    async fn run_pass(
        &self,
        panel: usize,
        prompt: &str,
        agent_ids: &[String],
    ) -> Option<ParsedJudgeOutput> {
        let session = match self
            .gateway
            .create_session_with_system_prompt(
                &self.settings.model,
                JudgePromptTemplate::judge_system(),
            )
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!("Judge panel {} could not open a session: {}", panel, e);
                return None;
            }
        };

        let raw = match session.send(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Judge panel {} failed: {}", panel, e);
                return None;
            }
        };

        match parse_judge_response(&raw, agent_ids) {
            Ok(parsed) => {
                for (agent, reason) in &parsed.rejected {
                    debug!("Judge panel {} dropped entry {}: {}", panel, agent, reason);
                }
                Some(parsed)
            }
            Err(e) => {
                warn!("Judge panel {} output unusable: {}", panel, e);
                None
            }
        }
    }
}
