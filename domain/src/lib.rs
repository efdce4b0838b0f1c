//! Domain layer for agent-arena
//!
//! This crate contains the core business rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns, and
//! every function in it is pure.
//!
//! # Core Concepts
//!
//! ## Race
//!
//! One task is answered by several agents, each playing a [`Persona`]. Their
//! [`AgentRunResult`]s are scored by a judge into [`JudgeScore`]s with
//! per-metric evidence, and the best one wins.
//!
//! ## Trust
//!
//! The [`ConfidenceGate`] decides from score structure alone (winner total,
//! margin, accuracy) whether a verdict is trustworthy enough to learn from.
//!
//! ## Learning
//!
//! A trusted, high-quality winner yields a pattern that is propagated to the
//! other agents and tracked in [`LearningRecord`]s.

pub mod agent;
pub mod core;
pub mod gate;
pub mod learning;
pub mod profile;
pub mod prompt;
pub mod scoring;

// Re-export commonly used types
pub use agent::{
    AgentRunResult, AgentSlot, Persona, ReasoningStep, RunCost, ToolCallKind, ToolCallRecord,
    ToolTelemetry, derive_step_confidence,
};
pub use core::{
    category::TaskCategory,
    error::DomainError,
    model::Model,
    task::{Task, TaskId, TaskStatus},
};
pub use gate::{ConfidenceGate, ConfidenceGateDecision, GateThresholds, derive_confidence_level};
pub use learning::{LearningKey, LearningRecord, extract_pattern, learning_skip_reason};
pub use profile::{DomainPlan, DomainProfile, PlanOverrides, resolve_plan};
pub use prompt::{AgentPromptTemplate, JudgePromptTemplate};
pub use scoring::{
    ConfidenceLevel, DiversityPolicy, Evidence, EvidenceSpan, JudgeMode, JudgeParseError,
    JudgeResult, JudgeScore, Metric, MetricEvidence, MetricScores, ObjectiveMode, PanelRun,
    ScoringPolicy, WeightVector,
};
