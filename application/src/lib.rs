//! Application layer for agent-arena
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentLimits, ArenaConfig, JudgeSettings, LearningSettings};
pub use ports::{
    agent_executor::{AgentExecutor, AgentRequest, ReasoningStepSink},
    classifier::DomainClassifier,
    composite_progress::CompositeProgress,
    learning_store::{DEFAULT_BASELINE, LearningStore, RaceHistory},
    llm_gateway::{GatewayError, LlmGateway, LlmReply, LlmSession},
    persistence::{NoPersistence, PersistenceError, PersistenceRecord, PersistenceSink},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::judge::{JudgeEngine, JudgeError, JudgeRequest};
pub use use_cases::learn::{LearnRequest, LearningEngine, LearningOutcome};
pub use use_cases::run_race::{RaceOutcome, RunRaceError, RunRaceInput, RunRaceUseCase};
