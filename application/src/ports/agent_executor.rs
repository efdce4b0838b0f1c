//! Agent executor port
//!
//! Runs one agent slot against the prepared task prompt. Executors never
//! raise: provider errors come back as failure-flagged results.

use super::progress::ProgressNotifier;
use arena_domain::{AgentRunResult, AgentSlot, ReasoningStep, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Everything an executor needs to run one agent
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub task_id: TaskId,
    pub slot: AgentSlot,
    /// Task prompt with guidance and learned patterns already appended
    pub prompt: String,
    /// Tools the domain plan grants
    pub tools: Vec<String>,
    pub max_turns: u32,
}

/// Per-agent reasoning step emitter.
///
/// Owns the agent's monotonic step counter and forwards every step to the
/// progress notifier as it happens.
pub struct ReasoningStepSink {
    task_id: TaskId,
    agent_id: String,
    counter: AtomicU32,
    progress: Arc<dyn ProgressNotifier>,
}

impl ReasoningStepSink {
    pub fn new(
        task_id: TaskId,
        agent_id: impl Into<String>,
        progress: Arc<dyn ProgressNotifier>,
    ) -> Self {
        Self {
            task_id,
            agent_id: agent_id.into(),
            counter: AtomicU32::new(0),
            progress,
        }
    }

    /// Record a thought as the next step and notify observers
    pub fn emit(&self, thought: impl Into<String>) -> ReasoningStep {
        let index = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let step = ReasoningStep::new(index, thought);
        self.progress
            .on_reasoning_step(&self.task_id, &self.agent_id, &step);
        step
    }

    /// Number of steps emitted so far
    pub fn emitted(&self) -> u32 {
        self.counter.load(Ordering::SeqCst)
    }
}

/// Executes agent slots
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(&self, request: AgentRequest, sink: ReasoningStepSink) -> AgentRunResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;

    #[test]
    fn test_sink_counts_from_one() {
        let sink = ReasoningStepSink::new(TaskId::new("t"), "agent-1", Arc::new(NoProgress));
        let first = sink.emit("Start by reading the input.");
        let second = sink.emit("Therefore the answer is 42.");
        assert_eq!(first.index, 1);
        assert_eq!(second.index, 2);
        assert_eq!(sink.emitted(), 2);
        assert!(second.confidence > first.confidence);
    }
}
