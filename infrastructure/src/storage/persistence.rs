//! File-backed persistence sink.
//!
//! Every record except verdicts is appended as one JSON line to
//! `ledger.jsonl`, stamped with a `timestamp`. Verdicts are upserted: each
//! task keeps exactly one `verdicts/<task_id>.json`, replaced atomically when
//! a later verdict arrives. File writes run on the blocking thread pool.

use arena_application::ports::persistence::{
    PersistenceError, PersistenceRecord, PersistenceSink,
};
use arena_domain::TaskId;
use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

const LEDGER_FILE: &str = "ledger.jsonl";
const VERDICT_DIR: &str = "verdicts";

pub struct FilePersistenceSink {
    root: PathBuf,
    ledger: Arc<Mutex<BufWriter<File>>>,
}

impl FilePersistenceSink {
    /// Open (or create) the ledger under `root`.
    ///
    /// Creates the directory tree if it doesn't exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(VERDICT_DIR)).map_err(|e| io_error(&root, e))?;

        let ledger_path = root.join(LEDGER_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&ledger_path)
            .map_err(|e| io_error(&ledger_path, e))?;

        Ok(Self {
            root,
            ledger: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.join(LEDGER_FILE)
    }

    pub fn verdict_path(&self, task_id: &TaskId) -> PathBuf {
        self.root
            .join(VERDICT_DIR)
            .join(format!("{}.json", task_id.as_str()))
    }

    /// The stored verdict of a task, if any
    pub fn load_verdict(
        &self,
        task_id: &TaskId,
    ) -> Result<Option<PersistenceRecord>, PersistenceError> {
        let path = self.verdict_path(task_id);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    fn verdict_json(record: &PersistenceRecord) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(record)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    fn ledger_line(record: &PersistenceRecord, timestamp: &str) -> Result<String, PersistenceError> {
        let mut value = serde_json::to_value(record)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp.to_string()),
            );
        }
        serde_json::to_string(&value).map_err(|e| PersistenceError::Serialization(e.to_string()))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PersistenceError {
    PersistenceError::Io(format!("{}: {}", path.display(), e))
}

fn append_lines(
    ledger: &Mutex<BufWriter<File>>,
    ledger_path: &Path,
    lines: &[String],
) -> Result<(), PersistenceError> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut writer = ledger
        .lock()
        .map_err(|_| PersistenceError::Io("ledger lock poisoned".to_string()))?;
    for line in lines {
        writeln!(writer, "{}", line).map_err(|e| io_error(ledger_path, e))?;
    }
    // Flush per batch for crash safety; the ledger is append-only
    writer.flush().map_err(|e| io_error(ledger_path, e))
}

fn replace_verdict(path: &Path, json: &str) -> Result<(), PersistenceError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))
}

#[async_trait]
impl PersistenceSink for FilePersistenceSink {
    async fn persist(&self, records: Vec<PersistenceRecord>) -> Result<(), PersistenceError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Serialize everything first so a bad record leaves the ledger untouched
        let mut lines = Vec::new();
        let mut verdicts = Vec::new();
        for record in &records {
            match record {
                PersistenceRecord::JudgeVerdict { task_id, .. } => {
                    verdicts.push((self.verdict_path(task_id), Self::verdict_json(record)?))
                }
                _ => lines.push(Self::ledger_line(record, &timestamp)?),
            }
        }

        let ledger = Arc::clone(&self.ledger);
        let ledger_path = self.ledger_path();
        tokio::task::spawn_blocking(move || {
            append_lines(&ledger, &ledger_path, &lines)?;
            verdicts
                .iter()
                .try_for_each(|(path, json)| replace_verdict(path, json))
        })
        .await
        .map_err(|e| PersistenceError::Io(format!("persistence writer failed: {}", e)))??;

        debug!(records = records.len(), root = %self.root.display(), "Persisted batch");
        Ok(())
    }
}

impl Drop for FilePersistenceSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.ledger.lock() {
            let _ = writer.flush();
        }
    }
}
