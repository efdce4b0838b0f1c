//! Prompt domain
//!
//! Templates for the two model-facing prompts of a race: the agent prompt
//! (persona + task + guidance) and the judge prompt (strict JSON scoring).

pub mod agent;
pub mod judge;

pub use agent::{AgentPromptTemplate, FINAL_ANSWER_MARKER, STEP_PREFIX};
pub use judge::JudgePromptTemplate;
