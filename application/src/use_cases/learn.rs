//! Learning engine
//!
//! Propagates a trusted winner's pattern to every other agent of the race
//! and reads the best patterns back for future prompts. The catalogue is
//! only touched through [`LearningStore::find`] and [`LearningStore::upsert`].

use crate::config::LearningSettings;
use crate::ports::learning_store::LearningStore;
use arena_domain::learning::is_transferable;
use arena_domain::{
    AgentRunResult, ConfidenceGateDecision, JudgeResult, LearningKey, LearningRecord,
    TaskCategory, extract_pattern, learning_skip_reason,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inputs of one learning pass
pub struct LearnRequest<'a> {
    pub winner: &'a AgentRunResult,
    pub judge: &'a JudgeResult,
    pub all_results: &'a [AgentRunResult],
    pub category: TaskCategory,
    pub lift: f64,
    pub gate: &'a ConfidenceGateDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LearningOutcome {
    Applied {
        pattern: String,
        records: Vec<LearningRecord>,
    },
    Skipped { reason: String },
}

impl LearningOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LearningOutcome::Applied { .. })
    }

    pub fn records(&self) -> &[LearningRecord] {
        match self {
            LearningOutcome::Applied { records, .. } => records,
            LearningOutcome::Skipped { .. } => &[],
        }
    }
}

pub struct LearningEngine {
    store: Arc<dyn LearningStore>,
    settings: LearningSettings,
}

impl LearningEngine {
    pub fn new(store: Arc<dyn LearningStore>, settings: LearningSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &LearningSettings {
        &self.settings
    }

    /// Learned patterns worth appending to a prompt for `category`
    pub async fn prompt_patterns(&self, category: TaskCategory) -> Vec<String> {
        if !self.settings.enabled {
            return Vec::new();
        }
        match self
            .store
            .top_patterns(
                category,
                self.settings.min_pattern_success,
                self.settings.max_patterns,
            )
            .await
        {
            Ok(patterns) => patterns.into_iter().filter(|p| is_transferable(p)).collect(),
            Err(e) => {
                warn!("Could not read learned patterns: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn learn(&self, request: LearnRequest<'_>) -> LearningOutcome {
        if !self.settings.enabled {
            return LearningOutcome::Skipped {
                reason: "learning disabled".to_string(),
            };
        }

        let winner_total = request
            .judge
            .score_for(&request.winner.agent_id)
            .map(|s| s.total)
            .unwrap_or(0);
        if let Some(reason) =
            learning_skip_reason(request.gate, winner_total, self.settings.quality_threshold)
        {
            return LearningOutcome::Skipped { reason };
        }

        let winner = request.winner;
        let pattern = extract_pattern(winner, request.category);
        debug!("Extracted pattern from {}: {}", winner.agent_id, pattern);

        let mut records = Vec::new();
        for target in request
            .all_results
            .iter()
            .filter(|r| r.agent_id != winner.agent_id)
        {
            let key = LearningKey::new(
                &target.agent_id,
                &winner.agent_id,
                request.category,
                winner.persona.as_str(),
            );

            let mut record = match self.store.find(&key).await {
                Ok(Some(existing)) => existing,
                Ok(None) => LearningRecord::new(key, pattern.clone()),
                Err(e) => {
                    warn!("Learning lookup for {} failed: {}", target.agent_id, e);
                    continue;
                }
            };
            record.apply(
                &pattern,
                winner_total,
                request.lift,
                self.settings.quality_threshold,
            );

            match self.store.upsert(record.clone()).await {
                Ok(()) => records.push(record),
                Err(e) => warn!("Learning upsert for {} failed: {}", target.agent_id, e),
            }
        }

        info!(
            "Propagated pattern from {} to {} agent(s)",
            winner.agent_id,
            records.len()
        );
        LearningOutcome::Applied { pattern, records }
    }
}
