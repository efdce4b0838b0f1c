//! Tool-call telemetry for a single agent run

use serde::{Deserialize, Serialize};

/// Coarse classification of a tool call, used by objective scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallKind {
    Test,
    Lint,
    TypeCheck,
    Execution,
    Search,
    FileIo,
    Other,
}

impl ToolCallKind {
    /// Classify a call from its tool name and (optional) command line
    pub fn classify(tool: &str, command: Option<&str>) -> ToolCallKind {
        let tool = tool.to_lowercase();
        let command = command.map(str::to_lowercase).unwrap_or_default();
        let haystack = format!("{} {}", tool, command);

        const TEST_MARKERS: [&str; 6] = ["pytest", "cargo test", "npm test", "go test", "jest", "run_tests"];
        const LINT_MARKERS: [&str; 5] = ["clippy", "eslint", "ruff", "flake8", "lint"];
        const TYPECHECK_MARKERS: [&str; 5] = ["mypy", "tsc", "pyright", "cargo check", "typecheck"];

        if TEST_MARKERS.iter().any(|m| haystack.contains(m)) || tool.contains("test") {
            ToolCallKind::Test
        } else if LINT_MARKERS.iter().any(|m| haystack.contains(m)) {
            ToolCallKind::Lint
        } else if TYPECHECK_MARKERS.iter().any(|m| haystack.contains(m)) {
            ToolCallKind::TypeCheck
        } else if ["code_exec", "shell", "bash", "python", "run_code"]
            .iter()
            .any(|m| tool.contains(m))
        {
            ToolCallKind::Execution
        } else if tool.contains("search") || tool.contains("fetch") {
            ToolCallKind::Search
        } else if tool.contains("file") || tool.contains("read") || tool.contains("write") {
            ToolCallKind::FileIo
        } else {
            ToolCallKind::Other
        }
    }

    /// Whether executing this kind of call counts as verifying work
    pub fn is_verification(&self) -> bool {
        matches!(
            self,
            ToolCallKind::Test | ToolCallKind::Lint | ToolCallKind::TypeCheck | ToolCallKind::Execution
        )
    }
}

/// One tool invocation observed during an agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: String,
    /// Agent turn on which the call happened (1-indexed)
    pub turn: u32,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl ToolCallRecord {
    pub fn new(tool: impl Into<String>, turn: u32, success: bool) -> Self {
        Self {
            tool: tool.into(),
            turn,
            success,
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn kind(&self) -> ToolCallKind {
        ToolCallKind::classify(&self.tool, self.command.as_deref())
    }
}

/// Summary of an agent's tool usage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolTelemetry {
    pub total_calls: usize,
    pub successful_calls: usize,
    pub verification_calls: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_tool_turn: Option<u32>,
    /// Ordered tool-call sequence
    pub calls: Vec<ToolCallRecord>,
}

impl ToolTelemetry {
    /// Derive the summary counters from the ordered call list
    pub fn from_calls(calls: Vec<ToolCallRecord>) -> Self {
        let total_calls = calls.len();
        let successful_calls = calls.iter().filter(|c| c.success).count();
        let verification_calls = calls.iter().filter(|c| c.kind().is_verification()).count();
        let first = calls.first();

        Self {
            total_calls,
            successful_calls,
            verification_calls,
            first_tool: first.map(|c| c.tool.clone()),
            first_tool_turn: first.map(|c| c.turn),
            calls,
        }
    }

    /// Tool names in call order
    pub fn sequence(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.tool.as_str()).collect()
    }

    /// Calls of the given kind
    pub fn calls_of(&self, kind: ToolCallKind) -> impl Iterator<Item = &ToolCallRecord> {
        self.calls.iter().filter(move |c| c.kind() == kind)
    }
}
