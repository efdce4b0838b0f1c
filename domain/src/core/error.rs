//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Invalid weight vector: {0}")]
    InvalidWeights(String),

    #[error("Unknown task category: {0}")]
    UnknownCategory(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Unknown judge mode: {0}")]
    UnknownJudgeMode(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::UnknownCategory("cooking".to_string());
        assert_eq!(error.to_string(), "Unknown task category: cooking");

        let error = DomainError::InvalidTransition {
            from: "completed".to_string(),
            to: "running".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: completed -> running"
        );
    }
}
