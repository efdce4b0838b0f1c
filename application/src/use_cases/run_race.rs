//! Run Race use case
//!
//! Orchestrates one race: resolve the domain plan, fan out every agent slot
//! concurrently, judge, gate, compute lift, persist and conditionally learn.

use crate::config::ArenaConfig;
use crate::ports::agent_executor::{AgentExecutor, AgentRequest, ReasoningStepSink};
use crate::ports::learning_store::{LearningStore, RaceHistory};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::persistence::{NoPersistence, PersistenceRecord, PersistenceSink};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::judge::{JudgeEngine, JudgeError, JudgeRequest};
use crate::use_cases::learn::{LearnRequest, LearningEngine, LearningOutcome};
use arena_domain::{
    AgentPromptTemplate, AgentRunResult, AgentSlot, ConfidenceGate, ConfidenceGateDecision,
    DomainError, DomainPlan, JudgeResult, PlanOverrides, Task, TaskCategory, TaskStatus,
    derive_confidence_level, resolve_plan,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can end a race without a verdict
#[derive(Error, Debug)]
pub enum RunRaceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid task: {0}")]
    InvalidTask(#[from] DomainError),

    #[error("All {} agents failed: {}", .errors.len(), .errors.join("; "))]
    AllAgentsFailed { task_id: String, errors: Vec<String> },
}

impl From<JudgeError> for RunRaceError {
    fn from(e: JudgeError) -> Self {
        RunRaceError::Configuration(e.to_string())
    }
}

/// Input for the RunRace use case
#[derive(Debug, Clone)]
pub struct RunRaceInput {
    pub prompt: String,
    pub category: TaskCategory,
    pub overrides: PlanOverrides,
}

impl RunRaceInput {
    pub fn new(prompt: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            prompt: prompt.into(),
            category,
            overrides: PlanOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: PlanOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Everything a settled race produced
#[derive(Debug, Clone, Serialize)]
pub struct RaceOutcome {
    pub task: Task,
    pub plan: DomainPlan,
    pub winner_id: String,
    pub judge: JudgeResult,
    pub gate: ConfidenceGateDecision,
    pub baseline: f64,
    /// Winner total minus the category baseline
    pub lift: f64,
    /// Every agent's result, in slot order
    pub agent_results: Vec<AgentRunResult>,
    pub learning: LearningOutcome,
}

impl RaceOutcome {
    pub fn learning_applied(&self) -> bool {
        self.learning.is_applied()
    }

    pub fn winner_result(&self) -> Option<&AgentRunResult> {
        self.agent_results
            .iter()
            .find(|r| r.agent_id == self.winner_id)
    }
}

/// Use case for running one race
pub struct RunRaceUseCase<G: LlmGateway + 'static> {
    executor: Arc<dyn AgentExecutor>,
    judge: JudgeEngine<G>,
    learning: LearningEngine,
    history: Arc<dyn RaceHistory>,
    persistence: Arc<dyn PersistenceSink>,
    config: ArenaConfig,
}

impl<G: LlmGateway + 'static> RunRaceUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        executor: Arc<dyn AgentExecutor>,
        store: Arc<dyn LearningStore>,
        history: Arc<dyn RaceHistory>,
        config: ArenaConfig,
    ) -> Self {
        Self {
            executor,
            judge: JudgeEngine::new(gateway, config.judge.clone()),
            learning: LearningEngine::new(store, config.learning.clone()),
            history,
            persistence: Arc::new(NoPersistence),
            config,
        }
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn PersistenceSink>) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunRaceInput) -> Result<RaceOutcome, RunRaceError> {
        self.execute_with_progress(input, Arc::new(NoProgress)).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunRaceInput,
        progress: Arc<dyn ProgressNotifier>,
    ) -> Result<RaceOutcome, RunRaceError> {
        self.config.validate().map_err(RunRaceError::Configuration)?;
        let mut task = Task::new(input.prompt, input.category)?;

        let mut overrides = input.overrides;
        if overrides.weights.is_none() {
            overrides.weights = self.config.judge.weights;
        }
        let plan = resolve_plan(task.category(), &overrides);
        info!(
            "Race {} ({}): {} agents, {} judging",
            task.id(),
            plan.category,
            self.config.agents.slots.len(),
            plan.judge_mode
        );

        let patterns = self.learning.prompt_patterns(plan.category).await;
        debug!("{} learned pattern(s) appended", patterns.len());
        let prompt = AgentPromptTemplate::task_prompt(task.prompt(), &plan.prompt_hints, &patterns);

        task.transition(TaskStatus::Running)?;
        let results = self.run_agents(&task, &plan, &prompt, &progress).await;

        let usable: Vec<AgentRunResult> = results.iter().filter(|r| r.is_usable()).cloned().collect();
        if usable.is_empty() {
            return Err(self.fail_race(task, results, &progress).await);
        }

        let mut judge = if let [only] = usable.as_slice() {
            info!("Only {} produced an answer; it wins by default", only.agent_id);
            JudgeEngine::<G>::by_default(only, plan.weights)
        } else {
            progress.on_judging_started(task.id(), plan.judge_mode, usable.len());
            self.judge
                .judge(&JudgeRequest {
                    prompt: task.prompt().to_string(),
                    category: plan.category,
                    results: usable,
                    weights: plan.weights,
                    mode: plan.judge_mode,
                    objective_mode: plan.objective_mode,
                })
                .await?
        };

        let gate = self.gate().evaluate(&judge);
        judge.confidence_level = derive_confidence_level(&gate, &judge);
        if !gate.passed {
            warn!("Confidence gate failed: {}", gate.reason);
            judge.annotate(&format!("[confidence gate failed: {}]", gate.reason));
        }

        let baseline = self.history.category_baseline(plan.category).await;
        let winner_total = judge.winner().map(|w| w.total).unwrap_or(0);
        let lift = f64::from(winner_total) - baseline;
        info!(
            "Winner {} scored {} (baseline {:.1}, lift {:+.1})",
            judge.winner_id, winner_total, baseline, lift
        );

        task.transition(TaskStatus::Completed)?;
        self.persist_race(&task, &results, &judge, &gate, baseline, lift)
            .await;
        if let Err(e) = self
            .history
            .record_winning_total(plan.category, winner_total)
            .await
        {
            warn!("Could not record winning total: {}", e);
        }

        let learning = match results.iter().find(|r| r.agent_id == judge.winner_id) {
            Some(winner) => {
                self.learning
                    .learn(LearnRequest {
                        winner,
                        judge: &judge,
                        all_results: &results,
                        category: plan.category,
                        lift,
                        gate: &gate,
                    })
                    .await
            }
            None => LearningOutcome::Skipped {
                reason: "winner result missing".to_string(),
            },
        };
        match &learning {
            LearningOutcome::Skipped { reason } => info!("Learning skipped: {}", reason),
            LearningOutcome::Applied { records, .. } => {
                self.persist_learning(&task, records).await;
            }
        }

        progress.on_complete(task.id(), Some(&judge));

        Ok(RaceOutcome {
            task,
            plan,
            winner_id: judge.winner_id.clone(),
            judge,
            gate,
            baseline,
            lift,
            agent_results: results,
            learning,
        })
    }

    fn gate(&self) -> ConfidenceGate {
        self.config.gate
    }

    /// Fan out every slot and wait for all of them to settle
    async fn run_agents(
        &self,
        task: &Task,
        plan: &DomainPlan,
        prompt: &str,
        progress: &Arc<dyn ProgressNotifier>,
    ) -> Vec<AgentRunResult> {
        let slots = &self.config.agents.slots;
        let limit = self.config.agents.timeout;
        progress.on_started(task.id(), slots);

        let mut join_set = JoinSet::new();
        for slot in slots {
            let executor = Arc::clone(&self.executor);
            let request = AgentRequest {
                task_id: task.id().clone(),
                slot: slot.clone(),
                prompt: prompt.to_string(),
                tools: plan.tools.clone(),
                max_turns: self.config.agents.max_turns,
            };
            let sink = ReasoningStepSink::new(task.id().clone(), &slot.agent_id, Arc::clone(progress));

            join_set.spawn(async move {
                let slot = request.slot.clone();
                run_with_deadline(executor, request, sink, limit, slot).await
            });
        }

        let mut settled = Vec::with_capacity(slots.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => {
                    if result.success {
                        info!("Agent {} answered", result.agent_id);
                    } else {
                        warn!(
                            "Agent {} failed: {}",
                            result.agent_id,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    progress.on_agent_complete(task.id(), &result);
                    settled.push(result);
                }
                Err(e) => {
                    warn!("Agent task join error: {}", e);
                }
            }
        }

        order_by_slot(slots, settled, |slot| {
            let result = AgentRunResult::failure(&slot.agent_id, slot.persona, "agent task aborted");
            progress.on_agent_complete(task.id(), &result);
            result
        })
    }

    /// Zero usable answers: persist what is known, mark failed, report
    async fn fail_race(
        &self,
        mut task: Task,
        results: Vec<AgentRunResult>,
        progress: &Arc<dyn ProgressNotifier>,
    ) -> RunRaceError {
        if let Err(e) = task.transition(TaskStatus::Failed) {
            warn!("{}", e);
        }
        let errors: Vec<String> = results
            .iter()
            .map(|r| {
                format!(
                    "{}: {}",
                    r.agent_id,
                    r.error.as_deref().unwrap_or("empty response")
                )
            })
            .collect();

        let mut records = vec![status_record(&task)];
        for result in &results {
            records.push(PersistenceRecord::FailureObservation {
                task_id: task.id().clone(),
                agent_id: result.agent_id.clone(),
                error: result
                    .error
                    .clone()
                    .unwrap_or_else(|| "empty response".to_string()),
            });
            records.push(PersistenceRecord::AgentResult {
                task_id: task.id().clone(),
                result: result.clone(),
            });
        }
        self.persist(records).await;

        progress.on_complete(task.id(), None);
        warn!("Race {} failed: no agent produced an answer", task.id());
        RunRaceError::AllAgentsFailed {
            task_id: task.id().to_string(),
            errors,
        }
    }

    async fn persist_race(
        &self,
        task: &Task,
        results: &[AgentRunResult],
        judge: &JudgeResult,
        gate: &ConfidenceGateDecision,
        baseline: f64,
        lift: f64,
    ) {
        let mut records = vec![status_record(task)];
        for result in results {
            records.push(PersistenceRecord::AgentResult {
                task_id: task.id().clone(),
                result: result.clone(),
            });
            for call in &result.telemetry.calls {
                records.push(PersistenceRecord::ToolUsage {
                    task_id: task.id().clone(),
                    agent_id: result.agent_id.clone(),
                    call: call.clone(),
                });
            }
        }
        records.push(PersistenceRecord::JudgeVerdict {
            task_id: task.id().clone(),
            judge: judge.clone(),
            gate: gate.clone(),
            baseline,
            lift,
        });
        self.persist(records).await;
    }

    async fn persist_learning(&self, task: &Task, records: &[arena_domain::LearningRecord]) {
        let batch = records
            .iter()
            .map(|record| PersistenceRecord::Learning {
                task_id: task.id().clone(),
                record: record.clone(),
            })
            .collect();
        self.persist(batch).await;
    }

    async fn persist(&self, records: Vec<PersistenceRecord>) {
        let count = records.len();
        match self.persistence.persist(records).await {
            Ok(()) => debug!("Persisted {} record(s)", count),
            Err(e) => warn!("Persistence failed for {} record(s): {}", count, e),
        }
    }
}

async fn run_with_deadline(
    executor: Arc<dyn AgentExecutor>,
    request: AgentRequest,
    sink: ReasoningStepSink,
    limit: Duration,
    slot: AgentSlot,
) -> AgentRunResult {
    let started = std::time::Instant::now();
    match tokio::time::timeout(limit, executor.execute(request, sink)).await {
        Ok(mut result) => {
            if result.cost.duration_ms == 0 {
                result.cost.duration_ms = started.elapsed().as_millis() as u64;
            }
            result
        }
        Err(_) => AgentRunResult::failure(
            slot.agent_id,
            slot.persona,
            format!("timed out after {}s", limit.as_secs_f64()),
        ),
    }
}

/// Results in slot order; slots that never settled are filled by `missing`
fn order_by_slot(
    slots: &[AgentSlot],
    mut settled: Vec<AgentRunResult>,
    mut missing: impl FnMut(&AgentSlot) -> AgentRunResult,
) -> Vec<AgentRunResult> {
    slots
        .iter()
        .map(|slot| {
            match settled.iter().position(|r| r.agent_id == slot.agent_id) {
                Some(idx) => settled.swap_remove(idx),
                None => missing(slot),
            }
        })
        .collect()
}

fn status_record(task: &Task) -> PersistenceRecord {
    PersistenceRecord::TaskStatus {
        task_id: task.id().clone(),
        category: task.category(),
        status: task.status(),
        prompt: task.prompt().to_string(),
        at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{
        AgentScript, MemoryStore, RecordingSink, ScriptedExecutor, ScriptedGateway, judge_json,
    };
    use arena_domain::{JudgeMode, LearningKey, LearningRecord};

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        executor: Arc<ScriptedExecutor>,
        store: Arc<MemoryStore>,
        sink: Arc<RecordingSink>,
    }

    impl Harness {
        fn new(replies: Vec<Result<String, String>>, scripts: Vec<(&str, AgentScript)>) -> Self {
            Self {
                gateway: Arc::new(ScriptedGateway::new(replies)),
                executor: Arc::new(ScriptedExecutor::new(scripts)),
                store: Arc::new(MemoryStore::default()),
                sink: Arc::new(RecordingSink::default()),
            }
        }

        fn use_case(&self, config: ArenaConfig) -> RunRaceUseCase<ScriptedGateway> {
            RunRaceUseCase::new(
                Arc::clone(&self.gateway),
                self.executor.clone(),
                self.store.clone(),
                self.store.clone(),
                config,
            )
            .with_persistence(self.sink.clone())
        }
    }

    fn three_answers() -> Vec<(&'static str, AgentScript)> {
        vec![
            (
                "agent-1",
                AgentScript::answer(
                    "Hash every record into buckets, then verify collisions explicitly.",
                    &["Check the 2 hot paths first because they dominate; therefore start there."],
                ),
            ),
            ("agent-2", AgentScript::answer("Sort the input and scan neighbours.", &[])),
            ("agent-3", AgentScript::answer("Brute force comparing pairs works fine.", &[])),
        ]
    }

    fn single_verdict() -> String {
        judge_json(&[
            ("agent-1", [9.0, 8.0, 8.0, 8.0]),
            ("agent-2", [6.0, 6.0, 6.0, 6.0]),
            ("agent-3", [5.0, 5.0, 5.0, 5.0]),
        ])
    }

    #[tokio::test]
    async fn test_full_race() {
        let h = Harness::new(vec![Ok(single_verdict())], three_answers());
        let outcome = h
            .use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("Find duplicates", TaskCategory::General))
            .await
            .unwrap();

        assert_eq!(outcome.winner_id, "agent-1");
        assert_eq!(outcome.task.status(), TaskStatus::Completed);
        assert_eq!(outcome.judge.mode, JudgeMode::Single);
        assert_eq!(outcome.judge.winner().unwrap().total, 33);
        assert!(outcome.gate.passed);
        assert_eq!(outcome.baseline, 20.0);
        assert_eq!(outcome.lift, 13.0);
        assert!(outcome.learning_applied());
        assert_eq!(outcome.learning.records().len(), 2);

        let ids: Vec<_> = outcome.agent_results.iter().map(|r| r.agent_id.as_str()).collect();
        assert_eq!(ids, vec!["agent-1", "agent-2", "agent-3"]);

        assert_eq!(
            h.sink.kinds(),
            vec![
                "task_status",
                "agent_result",
                "agent_result",
                "agent_result",
                "judge_verdict",
                "learning",
                "learning"
            ]
        );
        assert_eq!(h.store.category_baseline(TaskCategory::General).await, 33.0);
    }

    #[tokio::test]
    async fn test_scenario_a_single_survivor_wins_by_default() {
        let h = Harness::new(
            vec![],
            vec![
                ("agent-1", AgentScript::Fail("rate limited".to_string())),
                ("agent-2", AgentScript::answer("Only answer.", &[])),
                ("agent-3", AgentScript::answer("   ", &[])),
            ],
        );
        let outcome = h
            .use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("Anything", TaskCategory::General))
            .await
            .unwrap();

        assert_eq!(outcome.winner_id, "agent-2");
        let winner = outcome.judge.winner().unwrap();
        assert_eq!(winner.total, 20);
        assert_eq!(winner.metrics.accuracy, 5.0);
        assert_eq!(*h.gateway.sessions.lock().unwrap(), 0);

        // 20 < 26: gate fails, summary annotated, learning skipped
        assert!(!outcome.gate.passed);
        assert!(outcome.judge.summary.starts_with("won by default"));
        assert!(outcome.judge.summary.contains("[confidence gate failed: total 20 < 26"));
        assert!(!outcome.learning_applied());
        assert_eq!(*h.store.upserts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_all_agents_failed() {
        let h = Harness::new(
            vec![],
            vec![
                ("agent-1", AgentScript::Fail("boom".to_string())),
                ("agent-2", AgentScript::Fail("bust".to_string())),
                ("agent-3", AgentScript::answer("", &[])),
            ],
        );
        let err = h
            .use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("Anything", TaskCategory::Math))
            .await
            .unwrap_err();

        match err {
            RunRaceError::AllAgentsFailed { errors, .. } => {
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0], "agent-1: boom");
                assert_eq!(errors[2], "agent-3: empty response");
            }
            other => panic!("unexpected error: {other}"),
        }

        let kinds = h.sink.kinds();
        assert_eq!(kinds[0], "task_status");
        assert_eq!(kinds.iter().filter(|k| **k == "failure_observation").count(), 3);
        let batches = h.sink.batches.lock().unwrap();
        assert!(matches!(
            batches[0][0],
            PersistenceRecord::TaskStatus { status: TaskStatus::Failed, .. }
        ));
    }

    #[tokio::test]
    async fn test_timeout_and_panic_are_isolated() {
        let h = Harness::new(
            vec![Ok(judge_json(&[("agent-1", [8.0, 8.0, 8.0, 8.0])]))],
            vec![
                ("agent-1", AgentScript::answer("A real answer.", &[])),
                ("agent-2", AgentScript::Hang),
                ("agent-3", AgentScript::Panic),
            ],
        );
        let mut config = ArenaConfig::default();
        config.agents.timeout = Duration::from_millis(50);

        let outcome = h
            .use_case(config)
            .execute(RunRaceInput::new("Anything", TaskCategory::General))
            .await
            .unwrap();

        assert_eq!(outcome.winner_id, "agent-1");
        let errors: Vec<_> = outcome
            .agent_results
            .iter()
            .map(|r| r.error.clone().unwrap_or_default())
            .collect();
        assert_eq!(errors, vec!["", "timed out after 0.05s", "agent task aborted"]);
    }

    #[tokio::test]
    async fn test_consensus_for_coding() {
        let verdict = judge_json(&[
            ("agent-1", [9.0, 9.0, 9.0, 9.0]),
            ("agent-2", [6.0, 6.0, 6.0, 6.0]),
            ("agent-3", [5.0, 5.0, 5.0, 5.0]),
        ]);
        let h = Harness::new(
            vec![Ok(verdict.clone()), Ok(verdict.clone()), Ok(verdict)],
            three_answers(),
        );
        let outcome = h
            .use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("Write a dedup function", TaskCategory::Coding))
            .await
            .unwrap();

        assert_eq!(outcome.judge.mode, JudgeMode::Consensus);
        assert_eq!(outcome.judge.panels.len(), 3);
        assert_eq!(outcome.judge.panel_agreement, 1.0);
        assert_eq!(outcome.judge.disagreement_index, 0.0);
        // coding verification blends in the (low) objective score
        assert!(outcome.judge.winner().unwrap().objective_adjustment.is_some());
        assert_eq!(*h.gateway.sessions.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_not_fatal() {
        let mut h = Harness::new(vec![Ok(single_verdict())], three_answers());
        h.sink = Arc::new(RecordingSink::failing());
        let outcome = h
            .use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("Find duplicates", TaskCategory::General))
            .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn test_configuration_error_before_launch() {
        let h = Harness::new(vec![], three_answers());
        let mut config = ArenaConfig::default();
        config.agents.slots.clear();

        let err = h
            .use_case(config)
            .execute(RunRaceInput::new("Anything", TaskCategory::General))
            .await
            .unwrap_err();
        assert!(matches!(err, RunRaceError::Configuration(_)));
        assert!(h.executor.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected() {
        let h = Harness::new(vec![], three_answers());
        let err = h
            .use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("  ", TaskCategory::General))
            .await
            .unwrap_err();
        assert!(matches!(err, RunRaceError::InvalidTask(_)));
    }

    #[tokio::test]
    async fn test_prompt_carries_hints_and_learned_patterns() {
        let h = Harness::new(vec![Ok(single_verdict())], three_answers());
        let mut record = LearningRecord::new(
            LearningKey::new("agent-2", "agent-1", TaskCategory::General, "analytical"),
            "[persona:analytical][category:general][tools:none] check inputs",
        );
        record.success_rate = 0.9;
        h.store.records.lock().unwrap().push(record);

        h.use_case(ArenaConfig::default())
            .execute(RunRaceInput::new("Find duplicates", TaskCategory::General))
            .await
            .unwrap();

        let prompts = h.executor.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].starts_with("Find duplicates\n\nGuidance:"));
        assert!(prompts[0].contains("[category:general][tools:none] check inputs"));
    }

    #[tokio::test]
    async fn test_disabled_learning_and_gate() {
        let h = Harness::new(vec![Ok(single_verdict())], three_answers());
        let mut config = ArenaConfig::default();
        config.learning.enabled = false;
        config.gate = ConfidenceGate::disabled();

        let outcome = h
            .use_case(config)
            .execute(RunRaceInput::new("Find duplicates", TaskCategory::General))
            .await
            .unwrap();
        assert!(outcome.gate.passed);
        assert_eq!(outcome.gate.reason, "confidence gate disabled");
        assert_eq!(
            outcome.learning,
            LearningOutcome::Skipped {
                reason: "learning disabled".to_string()
            }
        );
    }
}
