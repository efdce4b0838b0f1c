//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where race ledgers and the learning catalogue live
///
/// ```toml
/// [storage]
/// data_dir = "~/.local/share/agent-arena"
/// persist = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub data_dir: Option<PathBuf>,
    /// Write verdicts, ledgers and the learning snapshot to `data_dir`
    pub persist: bool,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            persist: true,
        }
    }
}

impl FileStorageConfig {
    /// Configured directory (with `~` expanded), else the platform data dir
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(path) => Some(expand_home(path)),
            None => dirs::data_dir().map(|d| d.join("agent-arena")),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir() {
        let config = FileStorageConfig {
            data_dir: Some(PathBuf::from("/tmp/arena")),
            persist: true,
        };
        assert_eq!(config.resolve_data_dir(), Some(PathBuf::from("/tmp/arena")));
    }

    #[test]
    fn test_home_expansion() {
        let config = FileStorageConfig {
            data_dir: Some(PathBuf::from("~/arena")),
            persist: true,
        };
        let resolved = config.resolve_data_dir().unwrap();
        assert!(!resolved.starts_with("~"));
        assert!(resolved.ends_with("arena"));
    }
}
