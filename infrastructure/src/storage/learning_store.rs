//! File-backed learning catalogue and race history.
//!
//! State lives in memory behind an async lock. When a snapshot path is set,
//! every mutation rewrites the JSON snapshot so the next process picks up
//! where this one stopped. A mutation becomes visible only after its
//! snapshot has been written.

use arena_application::ports::learning_store::{DEFAULT_BASELINE, LearningStore, RaceHistory};
use arena_application::ports::persistence::PersistenceError;
use arena_domain::{LearningKey, LearningRecord, TaskCategory};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Serialized form of the whole store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Catalogue {
    #[serde(default)]
    records: Vec<LearningRecord>,
    /// Winning totals per category, oldest first
    #[serde(default)]
    winning_totals: HashMap<TaskCategory, Vec<u8>>,
}

pub struct FileLearningStore {
    catalogue: RwLock<Catalogue>,
    snapshot: Option<PathBuf>,
}

impl FileLearningStore {
    /// A store that forgets everything when dropped
    pub fn in_memory() -> Self {
        Self {
            catalogue: RwLock::new(Catalogue::default()),
            snapshot: None,
        }
    }

    /// Load the snapshot at `path` (if present) and keep it updated
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let catalogue = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| PersistenceError::Io(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&text).map_err(|e| {
                PersistenceError::Serialization(format!("{}: {}", path.display(), e))
            })?
        } else {
            Catalogue::default()
        };

        info!(
            path = %path.display(),
            records = catalogue.records.len(),
            "Learning store opened"
        );

        Ok(Self {
            catalogue: RwLock::new(catalogue),
            snapshot: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// Apply `change` to a copy, write it, then swap it in.
    ///
    /// The write lock is held until the swap so snapshots land in order.
    async fn commit(&self, change: impl FnOnce(&mut Catalogue)) -> Result<(), PersistenceError> {
        let mut current = self.catalogue.write().await;
        let mut next = current.clone();
        change(&mut next);
        self.save(&next).await?;
        *current = next;
        Ok(())
    }

    async fn save(&self, catalogue: &Catalogue) -> Result<(), PersistenceError> {
        let Some(path) = self.snapshot.clone() else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(catalogue)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        tokio::task::spawn_blocking(move || write_snapshot(&path, &json))
            .await
            .map_err(|e| PersistenceError::Io(format!("snapshot writer failed: {}", e)))?
    }
}

/// Write through a temporary file so a failed write leaves the old snapshot
fn write_snapshot(path: &Path, json: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| PersistenceError::Io(format!("{}: {}", parent.display(), e)))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| PersistenceError::Io(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "Learning snapshot written");
    Ok(())
}

#[async_trait]
impl LearningStore for FileLearningStore {
    async fn top_patterns(
        &self,
        category: TaskCategory,
        min_success_rate: f64,
        limit: usize,
    ) -> Result<Vec<String>, PersistenceError> {
        let catalogue = self.catalogue.read().await;
        let mut matching: Vec<&LearningRecord> = catalogue
            .records
            .iter()
            .filter(|r| r.key.category == category && r.success_rate >= min_success_rate)
            .collect();
        matching.sort_by(|a, b| {
            b.success_rate
                .total_cmp(&a.success_rate)
                .then(b.applications.cmp(&a.applications))
        });

        // the same winner pattern is stored once per target agent
        let mut patterns: Vec<String> = Vec::new();
        for record in matching {
            if patterns.len() == limit {
                break;
            }
            if !patterns.contains(&record.pattern) {
                patterns.push(record.pattern.clone());
            }
        }
        Ok(patterns)
    }

    async fn find(&self, key: &LearningKey) -> Result<Option<LearningRecord>, PersistenceError> {
        let catalogue = self.catalogue.read().await;
        Ok(catalogue.records.iter().find(|r| r.key.matches(key)).cloned())
    }

    async fn upsert(&self, record: LearningRecord) -> Result<(), PersistenceError> {
        self.commit(|catalogue| {
            match catalogue
                .records
                .iter_mut()
                .find(|r| r.key.matches(&record.key))
            {
                Some(existing) => *existing = record,
                None => catalogue.records.push(record),
            }
        })
        .await
    }

    async fn records(&self) -> Result<Vec<LearningRecord>, PersistenceError> {
        Ok(self.catalogue.read().await.records.clone())
    }
}

#[async_trait]
impl RaceHistory for FileLearningStore {
    async fn category_baseline(&self, category: TaskCategory) -> f64 {
        let catalogue = self.catalogue.read().await;
        match catalogue.winning_totals.get(&category) {
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
        self.commit(|catalogue| {
            catalogue
                .winning_totals
                .entry(category)
                .or_default()
                .push(total);
        })
        .await
    }
}
