//! Agent run domain
//!
//! Everything one agent produces for one task: the final response, the
//! ordered reasoning trace, tool telemetry and cost. Results are immutable
//! once built; the orchestrator only collects and forwards them.

pub mod persona;
pub mod result;
pub mod telemetry;

pub use persona::{AgentSlot, Persona};
pub use result::{AgentRunResult, ReasoningStep, RunCost, derive_step_confidence};
pub use telemetry::{ToolCallKind, ToolCallRecord, ToolTelemetry};
