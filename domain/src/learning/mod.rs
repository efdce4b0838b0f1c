//! Cross-agent learning rules
//!
//! A gate-passed, high-quality winner yields a compact pattern that is
//! propagated to every other agent. Each transfer is tracked in a
//! [`LearningRecord`] keyed by target, source, category and persona.

pub mod pattern;
pub mod record;

pub use pattern::{NO_TRANSFERABLE_PATTERN, extract_pattern, is_transferable, select_steps};
pub use record::{
    DEFAULT_QUALITY_THRESHOLD, EMA_RETAIN, LearningKey, LearningRecord, learning_skip_reason,
};
