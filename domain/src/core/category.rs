//! Task category value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of task categories.
///
/// Category drives the domain profile (default tools, judge mode, weights,
/// objective correction) and partitions the learning catalogue and the
/// historical baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    #[default]
    General,
    Coding,
    Math,
    Research,
    Creative,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::General,
        TaskCategory::Coding,
        TaskCategory::Math,
        TaskCategory::Research,
        TaskCategory::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::General => "general",
            TaskCategory::Coding => "coding",
            TaskCategory::Math => "math",
            TaskCategory::Research => "research",
            TaskCategory::Creative => "creative",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(TaskCategory::General),
            "coding" | "code" => Ok(TaskCategory::Coding),
            "math" | "maths" => Ok(TaskCategory::Math),
            "research" => Ok(TaskCategory::Research),
            "creative" | "writing" => Ok(TaskCategory::Creative),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("code".parse::<TaskCategory>().ok(), Some(TaskCategory::Coding));
        assert_eq!(" Math ".parse::<TaskCategory>().ok(), Some(TaskCategory::Math));
        assert_eq!(
            "writing".parse::<TaskCategory>().ok(),
            Some(TaskCategory::Creative)
        );
        assert!("cooking".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for category in TaskCategory::ALL {
            assert_eq!(category.to_string().parse::<TaskCategory>().ok(), Some(category));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TaskCategory::Research).unwrap();
        assert_eq!(json, "\"research\"");
    }
}
