//! Scripted port implementations shared by use case tests

use crate::ports::agent_executor::{AgentExecutor, AgentRequest, ReasoningStepSink};
use crate::ports::learning_store::{DEFAULT_BASELINE, LearningStore, RaceHistory};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmReply, LlmSession};
use crate::ports::persistence::{PersistenceError, PersistenceRecord, PersistenceSink};
use arena_domain::{AgentRunResult, LearningKey, LearningRecord, Model, TaskCategory};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Judge JSON with full evidence for each `(agent_id, [acc, comp, clar, ins])`
pub fn judge_json(entries: &[(&str, [f64; 4])]) -> String {
    let scores: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, m)| {
            let evidence = |metric: &str| {
                serde_json::json!({ "quote": format!("{} quote", metric), "rationale": "because" })
            };
            serde_json::json!({
                "agent_id": id,
                "accuracy": m[0],
                "completeness": m[1],
                "clarity": m[2],
                "insight": m[3],
                "reasoning": "scripted",
                "evidence": {
                    "accuracy": evidence("accuracy"),
                    "completeness": evidence("completeness"),
                    "clarity": evidence("clarity"),
                    "insight": evidence("insight"),
                }
            })
        })
        .collect();
    serde_json::json!({ "summary": "scripted verdict", "scores": scores }).to_string()
}

/// Gateway whose sessions answer from one shared queue, in session order
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub sessions: Mutex<usize>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sessions: Mutex::new(0),
        }
    }
}

struct ScriptedSession {
    model: Model,
    reply: Result<String, String>,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_with_usage(&self, _content: &str) -> Result<LlmReply, GatewayError> {
        match &self.reply {
            Ok(text) => Ok(LlmReply {
                text: text.clone(),
                tokens: 10,
            }),
            Err(e) => Err(GatewayError::RequestFailed(e.clone())),
        }
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        *self.sessions.lock().unwrap() += 1;
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("No more responses".to_string()));
        Ok(Box::new(ScriptedSession {
            model: model.clone(),
            reply,
        }))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        _system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.create_session(model).await
    }
}

/// What a scripted agent does
#[derive(Clone)]
pub enum AgentScript {
    Answer {
        response: String,
        thoughts: Vec<String>,
    },
    Fail(String),
    Hang,
    Panic,
}

impl AgentScript {
    pub fn answer(response: &str, thoughts: &[&str]) -> Self {
        AgentScript::Answer {
            response: response.to_string(),
            thoughts: thoughts.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Executor that plays a script per agent id and records the prompts it saw
pub struct ScriptedExecutor {
    scripts: HashMap<String, AgentScript>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(scripts: Vec<(&str, AgentScript)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(id, s)| (id.to_string(), s))
                .collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AgentExecutor for ScriptedExecutor {
    async fn execute(&self, request: AgentRequest, sink: ReasoningStepSink) -> AgentRunResult {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let slot = request.slot;
        match self.scripts.get(&slot.agent_id).cloned() {
            Some(AgentScript::Answer { response, thoughts }) => {
                let steps = thoughts.into_iter().map(|t| sink.emit(t)).collect();
                AgentRunResult::success(slot.agent_id, slot.persona, response, steps)
            }
            Some(AgentScript::Fail(error)) => {
                AgentRunResult::failure(slot.agent_id, slot.persona, error)
            }
            Some(AgentScript::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                AgentRunResult::failure(slot.agent_id, slot.persona, "woke up")
            }
            Some(AgentScript::Panic) => panic!("scripted agent panic"),
            None => AgentRunResult::failure(slot.agent_id, slot.persona, "no script"),
        }
    }
}

/// Persistence sink that keeps every batch, optionally failing
#[derive(Default)]
pub struct RecordingSink {
    pub batches: Mutex<Vec<Vec<PersistenceRecord>>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .map(|r| r.kind())
            .collect()
    }
}

#[async_trait]
impl PersistenceSink for RecordingSink {
    async fn persist(&self, records: Vec<PersistenceRecord>) -> Result<(), PersistenceError> {
        if self.fail {
            return Err(PersistenceError::Rejected("scripted failure".to_string()));
        }
        self.batches.lock().unwrap().push(records);
        Ok(())
    }
}

/// In-memory learning catalogue and race history
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<LearningRecord>>,
    pub totals: Mutex<HashMap<TaskCategory, Vec<u8>>>,
    pub upserts: Mutex<usize>,
}

#[async_trait]
impl LearningStore for MemoryStore {
    async fn top_patterns(
        &self,
        category: TaskCategory,
        min_success_rate: f64,
        limit: usize,
    ) -> Result<Vec<String>, PersistenceError> {
        let mut matching: Vec<LearningRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.key.category == category && r.success_rate >= min_success_rate)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));
        Ok(matching.into_iter().take(limit).map(|r| r.pattern).collect())
    }

    async fn find(&self, key: &LearningKey) -> Result<Option<LearningRecord>, PersistenceError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.key.matches(key))
            .cloned())
    }

    async fn upsert(&self, record: LearningRecord) -> Result<(), PersistenceError> {
        *self.upserts.lock().unwrap() += 1;
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.key.matches(&record.key)) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn records(&self) -> Result<Vec<LearningRecord>, PersistenceError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

#[async_trait]
impl RaceHistory for MemoryStore {
    async fn category_baseline(&self, category: TaskCategory) -> f64 {
        match self.totals.lock().unwrap().get(&category) {
            Some(totals) if !totals.is_empty() => {
                totals.iter().map(|t| f64::from(*t)).sum::<f64>() / totals.len() as f64
            }
            _ => DEFAULT_BASELINE,
        }
    }

    async fn record_winning_total(
        &self,
        category: TaskCategory,
        total: u8,
    ) -> Result<(), PersistenceError> {
        self.totals
            .lock()
            .unwrap()
            .entry(category)
            .or_default()
            .push(total);
        Ok(())
    }
}
