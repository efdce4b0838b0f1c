//! Learning catalogue and race history ports
//!
//! The learning catalogue is long-lived state shared across races. It is only
//! ever read and upserted through [`LearningStore`]; the EMA update itself
//! lives in [`arena_domain::LearningRecord::apply`].

use super::persistence::PersistenceError;
use arena_domain::{LearningKey, LearningRecord, TaskCategory};
use async_trait::async_trait;

/// Baseline used for a category with no recorded winners
pub const DEFAULT_BASELINE: f64 = 20.0;

#[async_trait]
pub trait LearningStore: Send + Sync {
    /// Patterns for `category` with success rate ≥ `min_success_rate`,
    /// best first, at most `limit`
    async fn top_patterns(
        &self,
        category: TaskCategory,
        min_success_rate: f64,
        limit: usize,
    ) -> Result<Vec<String>, PersistenceError>;

    /// The record whose key matches `key` (persona by substring)
    async fn find(&self, key: &LearningKey) -> Result<Option<LearningRecord>, PersistenceError>;

    /// Insert or replace the record with a matching key
    async fn upsert(&self, record: LearningRecord) -> Result<(), PersistenceError>;

    async fn records(&self) -> Result<Vec<LearningRecord>, PersistenceError>;
}

/// Historical winning totals per category
#[async_trait]
pub trait RaceHistory: Send + Sync {
    /// Mean historical winning total, or [`DEFAULT_BASELINE`] without history
    async fn category_baseline(&self, category: TaskCategory) -> f64;

    async fn record_winning_total(
        &self,
        category: TaskCategory,
        total: u8,
    ) -> Result<(), PersistenceError>;
}
