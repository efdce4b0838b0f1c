//! Structured configuration issues
//!
//! Validation never stops at the first problem: every section reports what it
//! found, and the caller decides whether warnings are worth printing and
//! whether errors abort the run.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a fallback value is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    /// A string field did not name any known variant
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field outside its allowed range
    OutOfRange {
        field: String,
        value: String,
        range: String,
    },
    /// A value that could not be parsed at all
    InvalidValue { field: String, value: String },
    /// A required value left empty
    EmptyValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn out_of_range(field: &str, value: impl ToString, range: &str) -> Self {
        let value = value.to_string();
        Self {
            severity: Severity::Error,
            message: format!("{}: {} is outside {}", field, value, range),
            code: ConfigIssueCode::OutOfRange {
                field: field.to_string(),
                value,
                range: range.to_string(),
            },
        }
    }

    pub fn invalid_value(field: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            severity: Severity::Error,
            message: format!("{}: invalid value '{}': {}", field, value, reason),
            code: ConfigIssueCode::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
            },
        }
    }

    pub fn empty(field: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: format!("{}: value cannot be empty", field),
            code: ConfigIssueCode::EmptyValue {
                field: field.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let issue = ConfigIssue::out_of_range("gate.min_total", 45, "[0, 40]");
        assert!(issue.is_error());
        assert_eq!(issue.message, "gate.min_total: 45 is outside [0, 40]");
        assert_eq!(
            issue.to_string(),
            "[error] gate.min_total: 45 is outside [0, 40]"
        );
    }
}
