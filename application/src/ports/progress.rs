//! Progress notification port
//!
//! Defines the interface for reporting progress during a race. Every event is
//! scoped by task id so observers of concurrent races never mix them up.

use arena_domain::{AgentRunResult, AgentSlot, JudgeMode, JudgeResult, ReasoningStep, TaskId};

/// Callback for progress updates during a race
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, log, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once, right before the agents are launched
    fn on_started(&self, task_id: &TaskId, slots: &[AgentSlot]);

    /// Called for each reasoning step as an agent produces it.
    ///
    /// `step.index` is monotonic per agent; steps of different agents
    /// interleave freely.
    fn on_reasoning_step(&self, _task_id: &TaskId, _agent_id: &str, _step: &ReasoningStep) {}

    /// Called when one agent settles (success, failure or timeout)
    fn on_agent_complete(&self, task_id: &TaskId, result: &AgentRunResult);

    /// Called when the judge is invoked over `candidates` usable answers
    fn on_judging_started(&self, _task_id: &TaskId, _mode: JudgeMode, _candidates: usize) {}

    /// Called when the race settles; `judge` is `None` if it failed
    fn on_complete(&self, task_id: &TaskId, judge: Option<&JudgeResult>);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_started(&self, _task_id: &TaskId, _slots: &[AgentSlot]) {}
    fn on_agent_complete(&self, _task_id: &TaskId, _result: &AgentRunResult) {}
    fn on_complete(&self, _task_id: &TaskId, _judge: Option<&JudgeResult>) {}
}
