//! Reference [`AgentExecutor`]: one persona-prompted model session per agent

use super::transcript::parse_transcript;
use arena_application::ports::agent_executor::{AgentExecutor, AgentRequest, ReasoningStepSink};
use arena_application::ports::llm_gateway::LlmGateway;
use arena_domain::prompt::FINAL_ANSWER_MARKER;
use arena_domain::{AgentPromptTemplate, AgentRunResult, ReasoningStep, RunCost};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs agents as plain chat sessions.
///
/// The persona's system prompt asks for `Step N:` lines and a final answer.
/// When a reply stops before the final answer, the session is asked to
/// continue, up to the request's `max_turns`. Tools named by the plan are
/// advertised in the prompt only; no tool is executed, so telemetry stays
/// empty.
pub struct LlmAgentExecutor {
    gateway: Arc<dyn LlmGateway>,
}

impl LlmAgentExecutor {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    fn continue_prompt() -> String {
        format!(
            "Continue from your last step. Finish with a line '{}' followed by your complete answer.",
            FINAL_ANSWER_MARKER
        )
    }
}

#[async_trait]
impl AgentExecutor for LlmAgentExecutor {
    async fn execute(&self, request: AgentRequest, sink: ReasoningStepSink) -> AgentRunResult {
        let started = Instant::now();
        let slot = &request.slot;
        let system = AgentPromptTemplate::agent_system(slot.persona, &request.tools);

        let session = match self
            .gateway
            .create_session_with_system_prompt(&slot.model, &system)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!(agent = %slot.agent_id, "Failed to open session: {}", e);
                return AgentRunResult::failure(&slot.agent_id, slot.persona, e.to_string());
            }
        };

        let mut steps: Vec<ReasoningStep> = Vec::new();
        let mut tokens = 0u64;
        let mut message = request.prompt.clone();
        let max_turns = request.max_turns.max(1);

        for turn in 1..=max_turns {
            let reply = match session.send_with_usage(&message).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(agent = %slot.agent_id, turn, "Agent request failed: {}", e);
                    return AgentRunResult::failure(&slot.agent_id, slot.persona, e.to_string())
                        .with_cost(cost(tokens, started));
                }
            };
            tokens += reply.tokens;

            let transcript = parse_transcript(&reply.text);
            debug!(
                agent = %slot.agent_id,
                turn,
                steps = transcript.steps.len(),
                finished = transcript.final_answer.is_some(),
                "Agent turn parsed"
            );
            steps.extend(transcript.steps.iter().map(|thought| sink.emit(thought.as_str())));

            if let Some(answer) = transcript.final_answer {
                return AgentRunResult::success(&slot.agent_id, slot.persona, answer, steps)
                    .with_cost(cost(tokens, started));
            }

            // a model ignoring the format entirely still produced an answer
            if steps.is_empty() && !reply.text.trim().is_empty() {
                return AgentRunResult::success(
                    &slot.agent_id,
                    slot.persona,
                    reply.text.trim(),
                    steps,
                )
                .with_cost(cost(tokens, started));
            }

            message = Self::continue_prompt();
        }

        AgentRunResult::failure(
            &slot.agent_id,
            slot.persona,
            format!("no final answer after {} turns", max_turns),
        )
        .with_cost(cost(tokens, started))
    }
}

fn cost(tokens: u64, started: Instant) -> RunCost {
    RunCost {
        tokens,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
