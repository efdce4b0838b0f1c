//! Persistence sink port
//!
//! Batched, best-effort writes of everything a race produced. A failed write
//! is logged by the caller and never fails the race.

use arena_domain::{
    AgentRunResult, ConfidenceGateDecision, JudgeResult, LearningRecord, TaskCategory, TaskId,
    TaskStatus, ToolCallRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// One record in a persistence batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersistenceRecord {
    TaskStatus {
        task_id: TaskId,
        category: TaskCategory,
        status: TaskStatus,
        prompt: String,
        at: DateTime<Utc>,
    },
    AgentResult {
        task_id: TaskId,
        result: AgentRunResult,
    },
    /// Upserted: a later verdict for the same task replaces the earlier one
    JudgeVerdict {
        task_id: TaskId,
        judge: JudgeResult,
        gate: ConfidenceGateDecision,
        baseline: f64,
        lift: f64,
    },
    ToolUsage {
        task_id: TaskId,
        agent_id: String,
        call: ToolCallRecord,
    },
    Learning {
        task_id: TaskId,
        record: LearningRecord,
    },
    FailureObservation {
        task_id: TaskId,
        agent_id: String,
        error: String,
    },
}

impl PersistenceRecord {
    pub fn task_id(&self) -> &TaskId {
        match self {
            PersistenceRecord::TaskStatus { task_id, .. }
            | PersistenceRecord::AgentResult { task_id, .. }
            | PersistenceRecord::JudgeVerdict { task_id, .. }
            | PersistenceRecord::ToolUsage { task_id, .. }
            | PersistenceRecord::Learning { task_id, .. }
            | PersistenceRecord::FailureObservation { task_id, .. } => task_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PersistenceRecord::TaskStatus { .. } => "task_status",
            PersistenceRecord::AgentResult { .. } => "agent_result",
            PersistenceRecord::JudgeVerdict { .. } => "judge_verdict",
            PersistenceRecord::ToolUsage { .. } => "tool_usage",
            PersistenceRecord::Learning { .. } => "learning",
            PersistenceRecord::FailureObservation { .. } => "failure_observation",
        }
    }
}

/// Receives persistence batches
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn persist(&self, records: Vec<PersistenceRecord>) -> Result<(), PersistenceError>;
}

/// Sink that drops every record
pub struct NoPersistence;

#[async_trait]
impl PersistenceSink for NoPersistence {
    async fn persist(&self, _records: Vec<PersistenceRecord>) -> Result<(), PersistenceError> {
        Ok(())
    }
}
